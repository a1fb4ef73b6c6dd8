use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;

/// Handles the USER FTP command.
///
/// There is a single shared password, so any user name is accepted and only
/// `PASS` decides.
pub async fn handle_user_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    username: &str,
) -> CommandResult {
    info!("Session {}: USER {}", session.id, username);
    session.reply(331, "User name okay, need password.").await?;
    Ok(CommandOutcome::Continue)
}
