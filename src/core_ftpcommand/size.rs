use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

pub async fn handle_size_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    match state.vfs.stat(&session.cwd, path).await {
        Ok(stat) => session.reply(213, &stat.size.to_string()).await?,
        Err(e) => reply_with_error(session, &e).await?,
    }
    Ok(CommandOutcome::Continue)
}
