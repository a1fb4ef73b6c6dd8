use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;

/// Handles the QUIT FTP command. The connection is closed once the reply is
/// out.
pub async fn handle_quit_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    info!("Session {}: client quit", session.id);
    session.reply(221, "Service closing control connection.").await?;
    Ok(CommandOutcome::Close)
}
