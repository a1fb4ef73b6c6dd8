use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

/// Handles the REST FTP command. The marker applies to the next RETR or
/// STOR only.
pub async fn handle_rest_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    arg: &str,
) -> CommandResult {
    match arg.parse::<u64>() {
        Ok(offset) => {
            session.restart_marker = offset;
            session
                .reply(350, &format!("Restart position accepted ({}).", offset))
                .await?;
        }
        Err(_) => session.reply(501, "Syntax error in parameters.").await?,
    }
    Ok(CommandOutcome::Continue)
}
