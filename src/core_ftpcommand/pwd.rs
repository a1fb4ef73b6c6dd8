use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

pub async fn handle_pwd_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    let response = format!("\"{}\" is current directory.", session.cwd);
    session.reply(257, &response).await?;
    Ok(CommandOutcome::Continue)
}
