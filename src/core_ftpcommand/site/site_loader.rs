use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

/// Stops the whole server. Every session, this one included, gets a `421`
/// once the reply below has been sent.
pub async fn handle_loader_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session.reply(200, "Exiting to loader.").await?;
    state.request_shutdown();
    Ok(CommandOutcome::Continue)
}
