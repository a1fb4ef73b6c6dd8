use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;

pub async fn handle_rmd_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    if path.is_empty() {
        session.reply(501, "Syntax error in parameters.").await?;
        return Ok(CommandOutcome::Continue);
    }

    match state.vfs.rmdir(&session.cwd, path).await {
        Ok(()) => {
            info!("Session {}: removed directory {}", session.id, path);
            session.reply(250, "Directory removed.").await?;
        }
        Err(e) => reply_with_error(session, &e).await?,
    }
    Ok(CommandOutcome::Continue)
}
