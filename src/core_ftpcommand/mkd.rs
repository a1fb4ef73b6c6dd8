use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::core_vfs::normalize;
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;

/// Handles the MKD FTP command.
///
/// The reply carries the absolute virtual path of the new directory.
pub async fn handle_mkd_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    if path.is_empty() {
        session.reply(501, "Syntax error in parameters.").await?;
        return Ok(CommandOutcome::Continue);
    }

    let created = state
        .vfs
        .mkdir(&session.cwd, path)
        .await
        .and_then(|()| normalize(&session.cwd, path));
    match created {
        Ok(abs_path) => {
            info!("Session {}: created directory {}", session.id, abs_path);
            session
                .reply(257, &format!("\"{}\" directory created.", abs_path))
                .await?;
        }
        Err(e) => reply_with_error(session, &e).await?,
    }
    Ok(CommandOutcome::Continue)
}
