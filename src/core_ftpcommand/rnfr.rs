use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::core_vfs::normalize;
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

/// Handles the RNFR FTP command.
///
/// The source is stored as an absolute path so a CWD between RNFR and RNTO
/// does not change what gets renamed.
pub async fn handle_rnfr_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    if path.is_empty() {
        session.reply(501, "Syntax error in parameters.").await?;
        return Ok(CommandOutcome::Continue);
    }

    match normalize(&session.cwd, path) {
        Ok(source) => {
            session.pending_rename = Some(source);
            session.reply(350, "Ready for RNTO.").await?;
        }
        Err(e) => {
            session.pending_rename = None;
            reply_with_error(session, &e).await?;
        }
    }
    Ok(CommandOutcome::Continue)
}
