use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::{reply_with_error, split};
use crate::core_network::data::prepare_data_connection;
use crate::core_network::transfer::Transfer;
use crate::core_vfs::DirIter;
use crate::server::ServerState;
use crate::session::Session;
use std::sync::Arc;

/// Path argument of LIST. Clients such as `LIST -aL` send `ls` flags first;
/// they are dropped, so paths starting with `-` cannot be listed.
fn list_path(arg: &str) -> String {
    let path = if arg.starts_with('-') {
        split(arg, ' ', 1).swap_remove(1)
    } else {
        arg.to_string()
    };
    if path.is_empty() {
        String::from(".")
    } else {
        path
    }
}

async fn bind_listing(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
    transfer: fn(DirIter) -> Transfer,
) -> CommandResult {
    match state.vfs.opendir(&session.cwd, path).await {
        Ok(iter) => prepare_data_connection(session, state, transfer(iter)).await,
        Err(e) => {
            reply_with_error(session, &e).await?;
            Ok(CommandOutcome::Continue)
        }
    }
}

pub async fn handle_list_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    arg: &str,
) -> CommandResult {
    let path = list_path(arg);
    bind_listing(session, state, &path, Transfer::DirList).await
}

pub async fn handle_nlst_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    arg: &str,
) -> CommandResult {
    let path = if arg.is_empty() { "." } else { arg };
    bind_listing(session, state, path, Transfer::DirNames).await
}
