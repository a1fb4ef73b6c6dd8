use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ControlError {
    #[error("received a null byte from client")]
    NulByte,

    #[error("received a line-feed from client without preceding carriage return")]
    BareLineFeed,

    #[error("received line longer than {0} bytes")]
    LineTooLong(usize),
}

/// Bounded receive buffer for the control connection.
///
/// Bytes are appended as they arrive and complete CRLF-terminated lines are
/// taken from the front; whatever follows the last terminator stays buffered
/// for the next read.
#[derive(Debug)]
pub struct LineBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Room left before the buffer is full.
    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// Appends freshly read bytes.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), ControlError> {
        if bytes.contains(&0) {
            return Err(ControlError::NulByte);
        }
        if bytes.len() > self.remaining() {
            return Err(ControlError::LineTooLong(self.capacity));
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Takes the next non-empty complete line, without its CRLF.
    pub fn next_line(&mut self) -> Result<Option<String>, ControlError> {
        loop {
            let Some(end) = self.buf.windows(2).position(|w| w == b"\r\n") else {
                return Ok(None);
            };
            if self.buf[..end].contains(&b'\n') {
                return Err(ControlError::BareLineFeed);
            }
            let line: Vec<u8> = self.buf.drain(..end + 2).take(end).collect();
            if !line.is_empty() {
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
        }
    }

    /// A full buffer without any terminator can never produce a line.
    pub fn check_overflow(&self) -> Result<(), ControlError> {
        if self.remaining() == 0 {
            Err(ControlError::LineTooLong(self.capacity))
        } else {
            Ok(())
        }
    }
}
