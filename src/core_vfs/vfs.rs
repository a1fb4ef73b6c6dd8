use crate::core_vfs::error::{VfsError, VfsResult};
use crate::core_vfs::partition::{DeviceManager, VirtualPartition};
use crate::core_vfs::path::{normalize, to_real_path, RealPath};
use log::{debug, trace};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::fs::{self, File, OpenOptions};

/// Metadata of a virtual path.
#[derive(Debug, Clone)]
pub struct FileStat {
    pub is_dir: bool,
    pub size: u64,
    pub modified: SystemTime,
}

impl FileStat {
    fn virtual_root() -> Self {
        Self {
            is_dir: true,
            size: 0,
            modified: SystemTime::now(),
        }
    }
}

impl From<std::fs::Metadata> for FileStat {
    fn from(metadata: std::fs::Metadata) -> Self {
        Self {
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().unwrap_or_else(|_| SystemTime::now()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write { truncate: bool },
    Append,
}

/// One entry produced by a [`DirIter`].
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub stat: FileStat,
}

/// Lazy directory iterator. Closing the directory is dropping the iterator.
pub enum DirIter {
    /// Yields one directory per partition mounted at the time of the call.
    VirtualRoot {
        devices: Arc<dyn DeviceManager>,
        position: usize,
    },
    Device {
        path: PathBuf,
        entries: fs::ReadDir,
    },
}

impl DirIter {
    pub async fn next_entry(&mut self) -> std::io::Result<Option<DirEntry>> {
        match self {
            DirIter::VirtualRoot { devices, position } => {
                let partitions = devices.partitions();
                while let Some(partition) = partitions.get(*position) {
                    *position += 1;
                    if partition.is_mounted() {
                        return Ok(Some(DirEntry {
                            name: partition.entry_name().to_string(),
                            stat: FileStat::virtual_root(),
                        }));
                    }
                }
                Ok(None)
            }
            DirIter::Device { path, entries } => {
                let Some(entry) = entries.next_entry().await? else {
                    return Ok(None);
                };
                let name = entry.file_name().to_string_lossy().into_owned();
                let stat = match fs::metadata(entry.path()).await {
                    Ok(metadata) => FileStat::from(metadata),
                    Err(e) => {
                        trace!("stat failed for {:?} in {:?}: {}", name, path, e);
                        FileStat {
                            is_dir: entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false),
                            size: 0,
                            modified: SystemTime::now(),
                        }
                    }
                };
                Ok(Some(DirEntry { name, stat }))
            }
        }
    }
}

/// The virtual filesystem: every primitive takes the session's working
/// directory and a client path, resolves it and delegates to the real
/// filesystem, except at the virtual root.
#[derive(Clone)]
pub struct Vfs {
    devices: Arc<dyn DeviceManager>,
}

impl Vfs {
    pub fn new(devices: Arc<dyn DeviceManager>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &Arc<dyn DeviceManager> {
        &self.devices
    }

    /// Unmounted partitions are not part of the namespace.
    fn mounted_partitions(&self) -> Vec<VirtualPartition> {
        self.devices
            .partitions()
            .into_iter()
            .filter(VirtualPartition::is_mounted)
            .collect()
    }

    pub fn resolve(&self, cwd: &str, path: &str) -> VfsResult<RealPath> {
        let real = to_real_path(&self.mounted_partitions(), cwd, path)?;
        debug!("Resolved {:?} (cwd {:?}) to {:?}", path, cwd, real);
        Ok(real)
    }

    /// Resolves a path that must live on a device; the root is refused.
    fn resolve_device(&self, cwd: &str, path: &str) -> VfsResult<PathBuf> {
        match self.resolve(cwd, path)? {
            RealPath::VirtualRoot => Err(VfsError::InvalidOperation),
            RealPath::Device(real) => Ok(PathBuf::from(real)),
        }
    }

    pub async fn stat(&self, cwd: &str, path: &str) -> VfsResult<FileStat> {
        match self.resolve(cwd, path)? {
            RealPath::VirtualRoot => Ok(FileStat::virtual_root()),
            RealPath::Device(real) => Ok(FileStat::from(fs::metadata(real).await?)),
        }
    }

    /// Returns the new working directory if `path` denotes a directory.
    pub async fn change_directory(&self, cwd: &str, path: &str) -> VfsResult<String> {
        if !self.stat(cwd, path).await?.is_dir {
            return Err(VfsError::NotADirectory);
        }
        normalize(cwd, path)
    }

    pub async fn open(&self, cwd: &str, path: &str, mode: OpenMode) -> VfsResult<File> {
        let real = self.resolve_device(cwd, path)?;
        let mut options = OpenOptions::new();
        match mode {
            OpenMode::Read => options.read(true),
            OpenMode::Write { truncate } => options.write(true).create(true).truncate(truncate),
            OpenMode::Append => options.append(true).create(true),
        };
        Ok(options.open(real).await?)
    }

    pub async fn unlink(&self, cwd: &str, path: &str) -> VfsResult<()> {
        let real = self.resolve_device(cwd, path)?;
        if fs::metadata(&real).await?.is_dir() {
            fs::remove_dir(real).await?;
        } else {
            fs::remove_file(real).await?;
        }
        Ok(())
    }

    pub async fn rmdir(&self, cwd: &str, path: &str) -> VfsResult<()> {
        let real = self.resolve_device(cwd, path)?;
        fs::remove_dir(real).await?;
        Ok(())
    }

    pub async fn mkdir(&self, cwd: &str, path: &str) -> VfsResult<()> {
        let real = self.resolve_device(cwd, path)?;
        fs::create_dir(real).await?;
        Ok(())
    }

    pub async fn rename(&self, cwd: &str, from_path: &str, to_path: &str) -> VfsResult<()> {
        let to = self.resolve_device(cwd, to_path)?;
        let from = self.resolve_device(cwd, from_path)?;
        fs::rename(from, to).await?;
        Ok(())
    }

    pub async fn opendir(&self, cwd: &str, path: &str) -> VfsResult<DirIter> {
        match self.resolve(cwd, path)? {
            RealPath::VirtualRoot => Ok(DirIter::VirtualRoot {
                devices: Arc::clone(&self.devices),
                position: 0,
            }),
            RealPath::Device(real) => {
                let path = PathBuf::from(real);
                let entries = fs::read_dir(&path).await?;
                Ok(DirIter::Device { path, entries })
            }
        }
    }
}
