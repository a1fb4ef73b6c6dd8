use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::server::ServerState;
use crate::session::Session;
use log::debug;
use std::sync::Arc;

/// Changes the session's directory to `path`, replying `250 <message>` on
/// success. Shared by CWD and CDUP.
pub async fn change_directory(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
    message: &str,
) -> CommandResult {
    match state.vfs.change_directory(&session.cwd, path).await {
        Ok(cwd) => {
            debug!("Session {}: cwd {} -> {}", session.id, session.cwd, cwd);
            session.cwd = cwd;
            session.reply(250, message).await?;
        }
        Err(e) => reply_with_error(session, &e).await?,
    }
    Ok(CommandOutcome::Continue)
}

pub async fn handle_cwd_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    change_directory(session, state, path, "CWD command successful.").await
}
