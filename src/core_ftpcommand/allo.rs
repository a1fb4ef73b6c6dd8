use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

/// Storage is never reserved ahead of a transfer.
pub async fn handle_allo_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session
        .reply(202, "Command not implemented, superfluous at this site.")
        .await?;
    Ok(CommandOutcome::Continue)
}
