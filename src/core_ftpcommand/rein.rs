use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

pub async fn handle_rein_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session.reinitialize();
    session.reply(220, "Service ready for new user.").await?;
    Ok(CommandOutcome::Continue)
}
