use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

/// Only stream mode is supported.
pub async fn handle_mode_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    arg: &str,
) -> CommandResult {
    if arg.eq_ignore_ascii_case("S") {
        session.reply(200, "Mode S ok.").await?;
    } else {
        session.reply(501, "Syntax error in parameters.").await?;
    }
    Ok(CommandOutcome::Continue)
}
