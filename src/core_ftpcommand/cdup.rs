use crate::core_ftpcommand::cwd::change_directory;
use crate::core_ftpcommand::handlers::CommandResult;
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

pub async fn handle_cdup_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    _arg: &str,
) -> CommandResult {
    change_directory(session, state, "..", "CDUP command successful.").await
}
