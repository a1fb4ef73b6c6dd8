use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;

/// Replaces the server-wide password. Sessions already logged in stay logged
/// in.
pub async fn handle_passwd_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    new_password: &str,
) -> CommandResult {
    state.set_password(Some(new_password.to_string()));
    info!("Session {}: password changed", session.id);
    session.reply(200, "Password changed.").await?;
    Ok(CommandOutcome::Continue)
}

pub async fn handle_nopasswd_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    state.set_password(None);
    info!("Session {}: authentication disabled", session.id);
    session.reply(200, "Authentication disabled.").await?;
    Ok(CommandOutcome::Continue)
}
