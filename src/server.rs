use crate::config::Config;
use crate::constants::DEVICE_CHECK_INTERVAL_SECS;
use crate::core_network::network::{accept_connection, spawn_session};
use crate::core_vfs::{DeviceManager, DirectoryDevices, Vfs};
use crate::session::SessionRegistry;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// State shared by every session of the server.
pub struct ServerState {
    pub config: Config,
    pub vfs: Vfs,
    pub sessions: SessionRegistry,
    password: RwLock<Option<String>>,
    passive_port: Mutex<u16>,
    shutdown: watch::Sender<bool>,
}

impl ServerState {
    pub fn new(config: Config, devices: Arc<dyn DeviceManager>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            vfs: Vfs::new(devices),
            sessions: SessionRegistry::new(config.server.max_clients),
            password: RwLock::new(config.server.password.clone()),
            passive_port: Mutex::new(config.server.pasv_port_start),
            shutdown,
            config,
        }
    }

    /// No password, or an empty one, accepts anything.
    pub fn check_password(&self, candidate: &str) -> bool {
        match &*self.password.read().unwrap_or_else(PoisonError::into_inner) {
            Some(password) if !password.is_empty() => password == candidate,
            _ => true,
        }
    }

    pub fn set_password(&self, password: Option<String>) {
        *self.password.write().unwrap_or_else(PoisonError::into_inner) = password;
    }

    /// Next passive port. The counter wraps back to `pasv_port_start` after
    /// 65535.
    pub fn next_passive_port(&self) -> u16 {
        let mut next = self.passive_port.lock().unwrap_or_else(PoisonError::into_inner);
        let port = *next;
        *next = port.checked_add(1).unwrap_or(self.config.server.pasv_port_start);
        port
    }

    pub fn request_shutdown(&self) {
        info!("Shutdown requested");
        self.shutdown.send_replace(true);
    }

    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

/// Resolves once shutdown has been requested.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            // Sender gone without a request: nothing will ever come.
            std::future::pending::<()>().await;
        }
    }
}

pub struct Server {
    listener: Option<TcpListener>,
    bind_addr: String,
    state: Arc<ServerState>,
}

impl Server {
    pub async fn bind(config: Config, devices: Arc<dyn DeviceManager>) -> Result<Self> {
        let bind_addr = format!("{}:{}", config.server.listen_address, config.server.listen_port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("Failed to bind control listener on {}", bind_addr))?;
        Ok(Self {
            listener: Some(listener),
            bind_addr,
            state: Arc::new(ServerState::new(config, devices)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        let listener = self
            .listener
            .as_ref()
            .context("Control listener is not bound")?;
        Ok(listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Accepts connections until shutdown is requested, then waits for every
    /// session to finish. A failing listener is dropped and rebound every
    /// second.
    pub async fn run(mut self) -> Result<()> {
        let mut sessions = JoinSet::new();
        let mut shutdown = self.state.subscribe_shutdown();

        loop {
            let Some(listener) = self.listener.as_ref() else {
                tokio::select! {
                    _ = wait_for_shutdown(&mut shutdown) => break,
                    _ = tokio::time::sleep(Duration::from_secs(1)) => {}
                }
                match TcpListener::bind(&self.bind_addr).await {
                    Ok(listener) => {
                        info!("Listening again on {}", self.bind_addr);
                        self.listener = Some(listener);
                    }
                    Err(e) => warn!("Unable to rebind {}: {}", self.bind_addr, e),
                }
                continue;
            };

            let accepted = tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => break,
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = joined {
                        error!("Session task failed: {}", e);
                    }
                    continue;
                }
                accepted = accept_connection(listener) => accepted,
            };

            match accepted {
                Ok((socket, peer_addr)) => spawn_session(&mut sessions, &self.state, socket, peer_addr),
                Err(e) => {
                    error!("{}", e);
                    self.listener = None;
                }
            }
        }

        self.listener = None;
        debug!("Waiting for {} session(s) to close", sessions.len());
        while let Some(joined) = sessions.join_next().await {
            if let Err(e) = joined {
                error!("Session task failed: {}", e);
            }
        }
        info!("Server stopped");
        Ok(())
    }
}

/// Mounts the configured partitions, serves until Ctrl-C or `SITE LOADER`,
/// then unmounts everything.
pub async fn run(config: Config) -> Result<()> {
    let devices = Arc::new(DirectoryDevices::from_config(&config.partitions));
    let server = Server::bind(config, devices.clone()).await?;
    let state = server.state();
    info!("Listening on {}", server.local_addr()?);

    let poller = {
        let devices = Arc::clone(&devices);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(DEVICE_CHECK_INTERVAL_SECS));
            loop {
                interval.tick().await;
                devices.poll_removable();
            }
        })
    };

    let signals = {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => state.request_shutdown(),
                Err(e) => error!("Unable to listen for Ctrl-C: {}", e),
            }
        })
    };

    let result = server.run().await;
    poller.abort();
    signals.abort();

    info!("Unmounting all partitions");
    devices.unmount_all();
    result
}
