use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_ftpcommand::utils::reply_with_error;
use crate::core_network::data::prepare_data_connection;
use crate::core_network::transfer::Transfer;
use crate::core_vfs::{OpenMode, VfsError};
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use std::io::SeekFrom;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

/// Moves `file` to the restart marker, if one is set.
pub async fn seek_to_marker(file: &mut File, marker: u64) -> Result<(), VfsError> {
    if marker > 0 {
        file.seek(SeekFrom::Start(marker)).await?;
    }
    Ok(())
}

/// Handles the RETR FTP command.
///
/// The restart marker is consumed whether or not the file could be opened.
pub async fn handle_retr_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    path: &str,
) -> CommandResult {
    let marker = session.take_restart_marker();
    let opened = match state.vfs.open(&session.cwd, path, OpenMode::Read).await {
        Ok(mut file) => seek_to_marker(&mut file, marker).await.map(|()| file),
        Err(e) => Err(e),
    };

    match opened {
        Ok(file) => {
            info!("Session {}: sending {} from offset {}", session.id, path, marker);
            prepare_data_connection(session, state, Transfer::file_read(file)).await
        }
        Err(e) => {
            reply_with_error(session, &e).await?;
            Ok(CommandOutcome::Continue)
        }
    }
}
