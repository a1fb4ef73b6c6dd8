pub mod error;
pub mod partition;
pub mod path;
pub mod vfs;

pub use error::{VfsError, VfsResult};
pub use partition::{DeviceManager, DirectoryDevices, VirtualPartition};
pub use path::{normalize, to_real_path, RealPath};
pub use vfs::{DirEntry, DirIter, FileStat, OpenMode, Vfs};
