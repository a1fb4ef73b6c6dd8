use thiserror::Error;

/// Errors raised while resolving or operating on a virtual path. The display
/// text is what clients see after a `550` reply code.
#[derive(Error, Debug)]
pub enum VfsError {
    #[error("Invalid path")]
    InvalidPath,

    #[error("No such device")]
    NoSuchDevice,

    #[error("File name too long")]
    PathTooLong,

    #[error("Operation not permitted")]
    InvalidOperation,

    #[error("Not a directory")]
    NotADirectory,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type VfsResult<T> = Result<T, VfsError>;
