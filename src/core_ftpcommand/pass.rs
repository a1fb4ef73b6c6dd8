use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;

/// Handles the PASS FTP command against the server-wide password.
pub async fn handle_pass_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    password: &str,
) -> CommandResult {
    if state.check_password(password) {
        session.authenticated = true;
        info!("Session {}: logged in from {}", session.id, session.peer_addr);
        session.reply(230, "User logged in, proceed.").await?;
    } else {
        warn!("Session {}: failed login from {}", session.id, session.peer_addr);
        session.reply(530, "Login incorrect.").await?;
    }
    Ok(CommandOutcome::Continue)
}
