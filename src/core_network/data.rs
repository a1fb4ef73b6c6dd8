use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::core_network::transfer::{Progress, Transfer, TransferError};
use crate::server::ServerState;
use crate::session::Session;
use log::{debug, warn};
use std::io;
use std::mem;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::time::{timeout_at, Instant};

#[derive(Default)]
pub enum DataState {
    #[default]
    Unbound,
    /// A transfer is bound and its connection must be established before
    /// `deadline`. `active` holds the prepared socket in active mode.
    AwaitingConnection {
        transfer: Transfer,
        deadline: Instant,
        active: Option<TcpSocket>,
    },
    Connected {
        socket: TcpStream,
        transfer: Transfer,
    },
}

/// Data connection of one session: the optional passive listener, the
/// active-mode target and the state of the bound transfer.
pub struct DataChannel {
    passive: Option<TcpListener>,
    active_target: SocketAddr,
    state: DataState,
}

impl DataChannel {
    /// The active-mode target starts out as the client's own address.
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self {
            passive: None,
            active_target: peer_addr,
            state: DataState::Unbound,
        }
    }

    /// Replaces the passive listener.
    pub fn set_passive(&mut self, listener: TcpListener) {
        self.passive = Some(listener);
    }

    /// Returns whether a listener was open.
    pub fn close_passive(&mut self) -> bool {
        let closed = self.passive.take().is_some();
        if closed {
            debug!("Closed passive listener");
        }
        closed
    }

    /// Switches to active mode towards `target`.
    pub fn set_active_target(&mut self, target: SocketAddr) {
        self.close_passive();
        self.active_target = target;
    }

    pub fn is_bound(&self) -> bool {
        !matches!(self.state, DataState::Unbound)
    }

    /// Binds `transfer` to the channel and arms the connection deadline.
    ///
    /// In passive mode the connection is accepted later on the existing
    /// listener. In active mode the outgoing socket is created and bound to
    /// `source_port` here, so a failure surfaces before anything is queued.
    pub fn bind(&mut self, transfer: Transfer, source_port: u16, timeout: Duration) -> io::Result<()> {
        let active = if self.passive.is_some() {
            None
        } else {
            let socket = TcpSocket::new_v4()?;
            socket.set_reuseaddr(true)?;
            if source_port != 0 {
                socket.bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, source_port)))?;
            }
            Some(socket)
        };
        debug!(
            "Bound {} ({} mode)",
            transfer.kind(),
            if active.is_some() { "active" } else { "passive" }
        );
        self.state = DataState::AwaitingConnection {
            transfer,
            deadline: Instant::now() + timeout,
            active,
        };
        Ok(())
    }

    /// Drives the bound transfer to completion. The channel is unbound
    /// afterwards whatever the outcome, which drops the data socket and the
    /// transfer's file or directory handle.
    pub async fn run(&mut self) -> Result<(), TransferError> {
        let result = self.drive().await;
        self.state = DataState::Unbound;
        result
    }

    async fn drive(&mut self) -> Result<(), TransferError> {
        if let DataState::AwaitingConnection { transfer, deadline, active } = mem::take(&mut self.state) {
            let socket = match timeout_at(deadline, self.establish(active)).await {
                Ok(socket) => socket?,
                Err(_) => return Err(TransferError::Timeout),
            };
            self.state = DataState::Connected { socket, transfer };
        }

        loop {
            let DataState::Connected { socket, transfer } = &mut self.state else {
                return Ok(());
            };
            if transfer.step(socket).await? == Progress::Done {
                return Ok(());
            }
        }
    }

    async fn establish(&self, active: Option<TcpSocket>) -> io::Result<TcpStream> {
        match active {
            Some(socket) => {
                let stream = socket.connect(self.active_target).await?;
                debug!("Connected data socket to {}", self.active_target);
                Ok(stream)
            }
            None => {
                let listener = self.passive.as_ref().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotConnected, "passive listener closed")
                })?;
                let (stream, addr) = listener.accept().await?;
                debug!("Accepted data connection from {}", addr);
                Ok(stream)
            }
        }
    }
}

/// Announces the transfer with `150` and binds it to the session's data
/// channel. The transfer itself runs once the handler has returned.
pub async fn prepare_data_connection(
    session: &mut Session,
    state: &ServerState,
    transfer: Transfer,
) -> CommandResult {
    session.reply(150, "Transferring data.").await?;

    let server = &state.config.server;
    if let Err(e) = session
        .data
        .bind(transfer, server.data_source_port, server.data_timeout())
    {
        warn!("Session {}: unable to prepare data connection: {}", session.id, e);
        session
            .reply(520, "Closing data connection, error occurred during transfer.")
            .await?;
    }
    Ok(CommandOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_vfs::{DeviceManager, DirIter, DirectoryDevices};
    use std::sync::Arc;
    use tokio::io::AsyncReadExt;

    fn root_listing() -> Transfer {
        let devices = Arc::new(DirectoryDevices::new());
        Transfer::DirNames(DirIter::VirtualRoot {
            devices: devices as Arc<dyn DeviceManager>,
            position: 0,
        })
    }

    #[tokio::test]
    async fn test_passive_transfer_runs_and_unbinds() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut channel = DataChannel::new(addr);
        channel.set_passive(listener);

        channel.bind(root_listing(), 0, Duration::from_secs(5)).unwrap();
        assert!(channel.is_bound());

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        channel.run().await.unwrap();
        assert!(!channel.is_bound());
        assert!(channel.close_passive(), "listener survives the transfer");
        assert!(client.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_passive_deadline_expires() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut channel = DataChannel::new(listener.local_addr().unwrap());
        channel.set_passive(listener);

        channel.bind(root_listing(), 0, Duration::from_millis(100)).unwrap();
        assert!(matches!(channel.run().await, Err(TransferError::Timeout)));
        assert!(!channel.is_bound());
    }

    #[tokio::test]
    async fn test_active_mode_connects_to_target() {
        let client_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = client_listener.local_addr().unwrap();
        let mut channel = DataChannel::new("127.0.0.1:1".parse().unwrap());
        channel.set_active_target(target);

        channel.bind(root_listing(), 0, Duration::from_secs(5)).unwrap();
        let accept = tokio::spawn(async move {
            let (mut stream, _) = client_listener.accept().await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        channel.run().await.unwrap();
        assert!(accept.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_port_closes_passive_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut channel = DataChannel::new(listener.local_addr().unwrap());
        channel.set_passive(listener);
        channel.set_active_target("127.0.0.1:2000".parse().unwrap());
        assert!(!channel.close_passive());
    }
}
