use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;

/// Handles the DELE FTP command. Empty directories are removed too.
pub async fn handle_dele_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    match state.vfs.unlink(&session.cwd, path).await {
        Ok(()) => {
            info!("Session {}: removed {}", session.id, path);
            session.reply(250, "File or directory removed.").await?;
        }
        Err(e) => reply_with_error(session, &e).await?,
    }
    Ok(CommandOutcome::Continue)
}
