use crate::constants::{FTP_BUFFER_SIZE, SHUTDOWN_NOTICE_TIMEOUT_SECS};
use crate::core_ftpcommand::handlers::{dispatch_command, CommandOutcome};
use crate::core_ftpcommand::utils::split;
use crate::core_network::control::LineBuffer;
use crate::core_network::NetworkError;
use crate::server::{wait_for_shutdown, ServerState};
use crate::session::{Session, SessionId};
use log::{debug, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio::time::timeout;

pub async fn accept_connection(listener: &TcpListener) -> Result<(TcpStream, SocketAddr), NetworkError> {
    listener.accept().await.map_err(NetworkError::Unavailable)
}

/// Registers the connection and runs it in its own task. At capacity the
/// socket is dropped without a reply.
pub fn spawn_session(
    sessions: &mut JoinSet<()>,
    state: &Arc<ServerState>,
    socket: TcpStream,
    peer_addr: SocketAddr,
) {
    let Some(registration) = state.sessions.register(peer_addr) else {
        warn!(
            "Maximum of {} clients reached, not accepting client {}",
            state.sessions.capacity(),
            peer_addr
        );
        return;
    };

    let state = Arc::clone(state);
    sessions.spawn(async move {
        let id = registration.id();
        info!(
            "Session {}: accepted connection from {} ({}/{})",
            id,
            peer_addr,
            state.sessions.len(),
            state.sessions.capacity()
        );
        if let Err(e) = handle_connection(socket, id, state).await {
            warn!("Session {}: {}", id, e);
        }
        info!("Session {}: closed connection to {}", id, peer_addr);
        drop(registration);
    });
}

pub async fn handle_connection(
    socket: TcpStream,
    id: SessionId,
    state: Arc<ServerState>,
) -> Result<(), NetworkError> {
    let peer_addr = socket.peer_addr()?;
    let local_addr = socket.local_addr()?;
    let (mut reader, writer) = socket.into_split();
    let mut session = Session::new(id, peer_addr, local_addr, writer);
    let mut shutdown = state.subscribe_shutdown();

    session.reply(220, &state.config.server.banner).await?;

    let served = tokio::select! {
        result = serve(&mut session, &mut reader, &state) => Some(result),
        _ = wait_for_shutdown(&mut shutdown) => None,
    };

    match served {
        Some(result) => result,
        None => {
            debug!("Session {}: server shutting down", id);
            let notice = session.reply(421, "Service not available, closing control connection.");
            match timeout(Duration::from_secs(SHUTDOWN_NOTICE_TIMEOUT_SECS), notice).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("Session {}: unable to send shutdown notice: {}", id, e),
                Err(_) => warn!("Session {}: client not reading, dropping without notice", id),
            }
            Ok(())
        }
    }
}

/// Control loop: extract complete lines, dispatch them one by one and run
/// any transfer a command bound before taking the next line.
async fn serve(
    session: &mut Session,
    reader: &mut OwnedReadHalf,
    state: &Arc<ServerState>,
) -> Result<(), NetworkError> {
    let mut buffer = LineBuffer::new(FTP_BUFFER_SIZE - 1);
    let mut chunk = [0u8; FTP_BUFFER_SIZE];

    loop {
        while let Some(line) = buffer.next_line()? {
            log_command(session.id, &line);
            if dispatch_command(session, state, &line).await? == CommandOutcome::Close {
                return Ok(());
            }
            if session.data.is_bound() {
                process_data_events(session).await?;
            }
        }

        buffer.check_overflow()?;
        let n = reader.read(&mut chunk[..buffer.remaining()]).await?;
        if n == 0 {
            debug!("Session {}: client closed the control connection", session.id);
            return Ok(());
        }
        buffer.extend(&chunk[..n])?;
    }
}

/// Runs the bound transfer and sends its final reply.
async fn process_data_events(session: &mut Session) -> io::Result<()> {
    match session.data.run().await {
        Ok(()) => {
            session
                .reply(226, "Closing data connection, transfer successful.")
                .await
        }
        Err(e) => {
            warn!("Session {}: data transfer failed: {}", session.id, e);
            session
                .reply(520, "Closing data connection, error occurred during transfer.")
                .await
        }
    }
}

fn log_command(id: SessionId, line: &str) {
    let parts = split(line, ' ', 1);
    let verb = parts.first().map(String::as_str).unwrap_or_default();
    if verb.eq_ignore_ascii_case("PASS") {
        debug!("Session {}: < PASS ********", id);
    } else {
        debug!("Session {}: < {}", id, line);
    }
}
