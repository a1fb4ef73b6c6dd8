use crate::constants::SERVER_NAME;
use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

pub async fn handle_syst_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session
        .reply(215, &format!("UNIX Type: L8 Version: {}", SERVER_NAME))
        .await?;
    Ok(CommandOutcome::Continue)
}
