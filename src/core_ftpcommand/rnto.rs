use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;

pub async fn handle_rnto_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    let Some(source) = session.pending_rename.take() else {
        session.reply(503, "RNFR required first.").await?;
        return Ok(CommandOutcome::Continue);
    };

    match state.vfs.rename(&session.cwd, &source, path).await {
        Ok(()) => {
            info!("Session {}: renamed {} to {}", session.id, source, path);
            session.reply(250, "Rename successful.").await?;
        }
        Err(e) => reply_with_error(session, &e).await?,
    }
    Ok(CommandOutcome::Continue)
}
