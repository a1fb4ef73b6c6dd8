// src/constants.rs

/// Size of the per-session control receive buffer. One byte is reserved, so a
/// command line (CRLF included) must fit in `FTP_BUFFER_SIZE - 1` bytes.
pub const FTP_BUFFER_SIZE: usize = 1024;

/// Upper bound on the length of a virtual path before normalization.
pub const PATH_MAX: usize = 4096;

/// Chunk size used by file transfer strategies.
pub const TRANSFER_CHUNK_SIZE: usize = 32 * 1024;

pub const DEFAULT_LISTEN_PORT: u16 = 21;
pub const DEFAULT_MAX_CLIENTS: usize = 5;
pub const DEFAULT_PASV_PORT_START: u16 = 1024;
pub const DEFAULT_DATA_SOURCE_PORT: u16 = 20;
pub const DEFAULT_DATA_TIMEOUT_SECS: u64 = 30;

/// Interval between two removable-device checks, in seconds.
pub const DEVICE_CHECK_INTERVAL_SECS: u64 = 2;

/// How long a session may take to deliver the `421` notice on shutdown.
pub const SHUTDOWN_NOTICE_TIMEOUT_SECS: u64 = 2;

pub const SERVER_NAME: &str = "mountftpd";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/mountftpd.conf";

/// `h1,h2,h3,h4,p1,p2` argument of the PORT command.
pub const PORT_ARGUMENT_PATTERN: &str = r"^(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})$";
