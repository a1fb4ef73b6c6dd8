use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

/// Permissions are not stored; the command is acknowledged so that clients
/// do not prompt after uploads.
pub async fn handle_chmod_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session.reply(250, "SITE CHMOD command ok.").await?;
    Ok(CommandOutcome::Continue)
}
