//! Data-plane strategies bound to a data connection.
//!
//! Each strategy moves one chunk per [`Transfer::step`]: a directory entry, or
//! up to `TRANSFER_CHUNK_SIZE` bytes of a file. Directory listings stay lazy,
//! one `next_entry` call per line.

use crate::constants::TRANSFER_CHUNK_SIZE;
use crate::core_vfs::{DirEntry, DirIter};
use chrono::{DateTime, Local};
use std::io;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("timed out waiting for data connection")]
    Timeout,

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Done,
}

pub enum Transfer {
    /// `LIST`: pseudo `ls -l` lines.
    DirList(DirIter),
    /// `NLST`: bare names.
    DirNames(DirIter),
    /// `RETR`: file to socket.
    FileRead { file: File, buffer: Vec<u8> },
    /// `STOR`/`APPE`: socket to file.
    FileWrite { file: File, buffer: Vec<u8> },
}

impl Transfer {
    pub fn file_read(file: File) -> Self {
        Transfer::FileRead {
            file,
            buffer: vec![0; TRANSFER_CHUNK_SIZE],
        }
    }

    pub fn file_write(file: File) -> Self {
        Transfer::FileWrite {
            file,
            buffer: vec![0; TRANSFER_CHUNK_SIZE],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Transfer::DirList(_) => "directory listing",
            Transfer::DirNames(_) => "name listing",
            Transfer::FileRead { .. } => "download",
            Transfer::FileWrite { .. } => "upload",
        }
    }

    /// Produces or consumes the next chunk on `socket`.
    pub async fn step<S>(&mut self, socket: &mut S) -> io::Result<Progress>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match self {
            Transfer::DirList(iter) => match iter.next_entry().await? {
                Some(entry) => {
                    socket.write_all(format_list_line(&entry).as_bytes()).await?;
                    Ok(Progress::Continue)
                }
                None => finish_sending(socket).await,
            },
            Transfer::DirNames(iter) => match iter.next_entry().await? {
                Some(entry) => {
                    socket.write_all(format!("{}\r\n", entry.name).as_bytes()).await?;
                    Ok(Progress::Continue)
                }
                None => finish_sending(socket).await,
            },
            Transfer::FileRead { file, buffer } => {
                let n = file.read(buffer).await?;
                if n == 0 {
                    return finish_sending(socket).await;
                }
                socket.write_all(&buffer[..n]).await?;
                Ok(Progress::Continue)
            }
            Transfer::FileWrite { file, buffer } => {
                let n = socket.read(buffer).await?;
                if n == 0 {
                    file.flush().await?;
                    return Ok(Progress::Done);
                }
                file.write_all(&buffer[..n]).await?;
                Ok(Progress::Continue)
            }
        }
    }
}

async fn finish_sending<S>(socket: &mut S) -> io::Result<Progress>
where
    S: AsyncWrite + Unpin,
{
    socket.flush().await?;
    socket.shutdown().await?;
    Ok(Progress::Done)
}

/// Formats one `LIST` record: permissions, owner and group `0`, size,
/// `%b %d  %Y` date and name.
pub fn format_list_line(entry: &DirEntry) -> String {
    let timestamp = DateTime::<Local>::from(entry.stat.modified).format("%b %d  %Y");
    format!(
        "{}rwxr-xr-x    1 0        0        {:>10} {} {}\r\n",
        if entry.stat.is_dir { 'd' } else { '-' },
        entry.stat.size,
        timestamp,
        entry.name
    )
}
