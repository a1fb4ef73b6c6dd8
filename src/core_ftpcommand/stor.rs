use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::retr::seek_to_marker;
use crate::core_ftpcommand::utils::reply_with_error;
use crate::core_network::data::prepare_data_connection;
use crate::core_network::transfer::Transfer;
use crate::core_vfs::{OpenMode, VfsResult};
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::fs::File;

async fn receive_into(
    session: &mut Session,
    state: &Arc<ServerState>,
    opened: VfsResult<File>,
) -> CommandResult {
    match opened {
        Ok(file) => prepare_data_connection(session, state, Transfer::file_write(file)).await,
        Err(e) => {
            reply_with_error(session, &e).await?;
            Ok(CommandOutcome::Continue)
        }
    }
}

/// Handles the STOR FTP command.
///
/// With a restart marker the file is kept and written from the marker on,
/// otherwise it is truncated.
pub async fn handle_stor_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    let marker = session.take_restart_marker();
    let mode = OpenMode::Write { truncate: marker == 0 };
    let opened = match state.vfs.open(&session.cwd, path, mode).await {
        Ok(mut file) => seek_to_marker(&mut file, marker).await.map(|()| file),
        Err(e) => Err(e),
    };
    info!("Session {}: receiving {} at offset {}", session.id, path, marker);
    receive_into(session, state, opened).await
}

pub async fn handle_appe_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    let opened = state.vfs.open(&session.cwd, path, OpenMode::Append).await;
    info!("Session {}: appending to {}", session.id, path);
    receive_into(session, state, opened).await
}
