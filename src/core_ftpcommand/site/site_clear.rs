use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use std::io::Write;
use std::sync::Arc;

/// Scrolls the server console away and homes the cursor on line 2.
pub async fn handle_clear_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    session.reply(200, "Cleared.").await?;

    let cleared = "\n".repeat(100) + "\x1b[2;0H";
    {
        let mut stdout = std::io::stdout().lock();
        // The console is best effort; the client already has its reply.
        let _ = stdout.write_all(cleared.as_bytes()).and_then(|()| stdout.flush());
    }
    Ok(CommandOutcome::Continue)
}
