pub mod control;
pub mod data;
pub mod network;
pub mod pasv;
pub mod port;
pub mod transfer;

#[cfg(test)]
mod test_network;

use crate::core_network::control::ControlError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// The listening socket failed; the server has to rebind.
    #[error("listener unavailable: {0}")]
    Unavailable(#[source] io::Error),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ControlError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
