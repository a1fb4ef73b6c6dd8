use crate::core_network::data::DataChannel;
use log::{debug, trace};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationType {
    Ascii,
    Image,
}

/// State of one control connection.
pub struct Session {
    pub id: SessionId,
    pub peer_addr: SocketAddr,
    pub local_addr: SocketAddr,
    control: OwnedWriteHalf,
    pub representation_type: RepresentationType,
    /// Absolute virtual path, no trailing slash except for the root.
    pub cwd: String,
    /// Normalized source of a pending RNFR.
    pub pending_rename: Option<String>,
    pub restart_marker: u64,
    pub authenticated: bool,
    pub data: DataChannel,
}

impl Session {
    pub fn new(
        id: SessionId,
        peer_addr: SocketAddr,
        local_addr: SocketAddr,
        control: OwnedWriteHalf,
    ) -> Self {
        Self {
            id,
            peer_addr,
            local_addr,
            control,
            representation_type: RepresentationType::Ascii,
            cwd: String::from("/"),
            pending_rename: None,
            restart_marker: 0,
            authenticated: false,
            data: DataChannel::new(peer_addr),
        }
    }

    /// Writes a single-line `<code> <msg>` reply.
    pub async fn reply(&mut self, code: u16, msg: &str) -> io::Result<()> {
        trace!("Session {}: > {} {}", self.id, code, msg);
        self.control
            .write_all(format!("{} {}\r\n", code, msg).as_bytes())
            .await
    }

    /// Back to the state of a freshly accepted connection (REIN).
    pub fn reinitialize(&mut self) {
        self.data.close_passive();
        self.cwd = String::from("/");
        self.representation_type = RepresentationType::Ascii;
        self.pending_rename = None;
        self.restart_marker = 0;
        self.authenticated = false;
    }

    /// Returns the restart marker and clears it.
    pub fn take_restart_marker(&mut self) -> u64 {
        std::mem::take(&mut self.restart_marker)
    }
}

/// Live sessions, bounded by the configured client capacity.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SocketAddr>>>,
    capacity: usize,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            capacity,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Reserves a slot for a new connection, or `None` at capacity.
    pub fn register(&self, peer_addr: SocketAddr) -> Option<SessionRegistration> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if sessions.len() >= self.capacity {
            return None;
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        sessions.insert(id, peer_addr);
        debug!("Registered session {} ({}/{})", id, sessions.len(), self.capacity);
        Some(SessionRegistration {
            id,
            sessions: Arc::clone(&self.sessions),
        })
    }
}

/// Keeps a registry slot alive; dropping it frees the slot.
#[derive(Debug)]
pub struct SessionRegistration {
    id: SessionId,
    sessions: Arc<Mutex<HashMap<SessionId, SocketAddr>>>,
}

impl SessionRegistration {
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Drop for SessionRegistration {
    fn drop(&mut self) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
