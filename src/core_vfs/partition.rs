use crate::config::PartitionConfig;
use log::{info, warn};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// A mountable device exposed under a single alias in the virtual root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPartition {
    pub name: String,
    pub alias: String,
    pub prefix: String,
    pub mounted: bool,
}

impl VirtualPartition {
    pub fn new(name: &str, alias: &str, prefix: &str, mounted: bool) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.to_string(),
            prefix: prefix.to_string(),
            mounted,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Name of the synthetic root entry for this partition.
    pub fn entry_name(&self) -> &str {
        self.alias.trim_start_matches('/')
    }
}

/// The mount collaborator consumed by the VFS and by `SITE MOUNT`/`UNMOUNT`.
pub trait DeviceManager: Send + Sync {
    /// Ordered snapshot of every known partition.
    fn partitions(&self) -> Vec<VirtualPartition>;

    fn mount(&self, alias: &str) -> bool;

    fn unmount(&self, alias: &str) -> bool;

    fn unmount_all(&self) {
        for partition in self.partitions() {
            if partition.is_mounted() {
                self.unmount(&partition.alias);
            }
        }
    }
}

#[derive(Debug)]
struct DirectoryDevice {
    partition: VirtualPartition,
    removable: bool,
}

/// Partitions backed by host directories.
#[derive(Debug, Default)]
pub struct DirectoryDevices {
    devices: RwLock<Vec<DirectoryDevice>>,
}

impl DirectoryDevices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the device table and mounts every partition flagged `automount`.
    pub fn from_config(partitions: &[PartitionConfig]) -> Self {
        let devices = Self::new();
        for partition in partitions {
            devices.add(&partition.name, &partition.alias, &partition.prefix, partition.removable);
            if partition.automount && !devices.mount(&partition.alias) {
                warn!("{} failed to automount from {}", partition.name, partition.prefix);
            }
        }
        devices
    }

    /// Registers an unmounted partition.
    pub fn add(&self, name: &str, alias: &str, prefix: &str, removable: bool) {
        let alias = canonical_alias(alias);
        // The remainder of a virtual path is appended as-is.
        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DirectoryDevice {
                partition: VirtualPartition::new(name, &alias, &prefix, false),
                removable,
            });
    }

    /// Mounts removable partitions whose directory appeared and unmounts the
    /// ones whose directory went away.
    pub fn poll_removable(&self) {
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        for device in devices.iter_mut().filter(|device| device.removable) {
            let present = Path::new(&device.partition.prefix).is_dir();
            if present && !device.partition.mounted {
                info!("Device inserted; mounting {}", device.partition.name);
                device.partition.mounted = true;
            } else if !present && device.partition.mounted {
                info!("Device removed; unmounting {}", device.partition.name);
                device.partition.mounted = false;
            }
        }
    }

    fn set_mounted(&self, alias: &str, mounted: bool) -> bool {
        let alias = canonical_alias(alias);
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        let Some(device) = devices
            .iter_mut()
            .find(|device| device.partition.alias.eq_ignore_ascii_case(&alias))
        else {
            warn!("No partition with alias {}", alias);
            return false;
        };
        if device.partition.mounted == mounted {
            return false;
        }
        if mounted && !Path::new(&device.partition.prefix).is_dir() {
            warn!("Mounting {} failed: {} is not a directory", device.partition.name, device.partition.prefix);
            return false;
        }
        device.partition.mounted = mounted;
        info!(
            "{} {}",
            if mounted { "Mounted" } else { "Unmounted" },
            device.partition.name
        );
        true
    }
}

impl DeviceManager for DirectoryDevices {
    fn partitions(&self) -> Vec<VirtualPartition> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|device| device.partition.clone())
            .collect()
    }

    fn mount(&self, alias: &str) -> bool {
        self.set_mounted(alias, true)
    }

    fn unmount(&self, alias: &str) -> bool {
        self.set_mounted(alias, false)
    }
}

fn canonical_alias(alias: &str) -> String {
    let alias = alias.trim();
    if alias.starts_with('/') {
        alias.to_string()
    } else {
        format!("/{}", alias)
    }
}
