use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

pub async fn handle_noop_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session.reply(200, "NOOP command successful.").await?;
    Ok(CommandOutcome::Continue)
}
