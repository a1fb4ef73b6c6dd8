//! Virtual path normalization and translation to real paths.
//!
//! Client paths are interpreted relative to the session's working directory
//! unless absolute. Normalized paths never contain `.` or `..` segments and
//! the root is always `/`. The first segment(s) of a normalized path name a
//! partition alias, which is swapped for the partition's real prefix.

use crate::constants::PATH_MAX;
use crate::core_vfs::error::{VfsError, VfsResult};
use crate::core_vfs::partition::VirtualPartition;

/// Outcome of translating a virtual path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealPath {
    /// The synthetic top-level directory listing the partition aliases.
    VirtualRoot,
    /// A path on a partition, prefix already applied.
    Device(String),
}

/// Resolves `path` against `cwd` and collapses it.
///
/// Runs of slashes count as a single separator, `.` segments are dropped and
/// `..` removes the previous segment without ever climbing above the root.
pub fn normalize(cwd: &str, path: &str) -> VfsResult<String> {
    let joined_len = if path.starts_with('/') {
        path.len()
    } else {
        cwd.len() + 1 + path.len()
    };
    if joined_len > PATH_MAX {
        return Err(VfsError::PathTooLong);
    }

    let relative_base = if path.starts_with('/') { "" } else { cwd };
    let mut segments: Vec<&str> = Vec::new();
    for segment in relative_base.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    let mut normalized = String::with_capacity(joined_len + 1);
    for segment in &segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    Ok(normalized)
}

/// Translates a client-visible path into a real path.
///
/// `"/carda/foo"` becomes `"carda:/foo"` for a partition aliased `/carda`
/// with prefix `carda:/`. The bare root maps to [`RealPath::VirtualRoot`].
pub fn to_real_path(
    partitions: &[VirtualPartition],
    cwd: &str,
    path: &str,
) -> VfsResult<RealPath> {
    if path.contains(':') {
        return Err(VfsError::InvalidPath);
    }

    let virtual_path = normalize(cwd, path)?;
    if virtual_path == "/" {
        return Ok(RealPath::VirtualRoot);
    }

    let (partition, rest) = partitions
        .iter()
        .filter_map(|partition| match_alias(&partition.alias, &virtual_path).map(|rest| (partition, rest)))
        .max_by_key(|(partition, _)| partition.alias.len())
        .ok_or(VfsError::NoSuchDevice)?;

    let real_len = partition.prefix.len() + rest.len();
    if real_len > PATH_MAX {
        return Err(VfsError::PathTooLong);
    }
    let mut real = String::with_capacity(real_len);
    real.push_str(&partition.prefix);
    real.push_str(rest);
    Ok(RealPath::Device(real))
}

/// Returns the remainder of `virtual_path` after `alias` when the alias covers
/// whole segments, compared case-insensitively.
fn match_alias<'a>(alias: &str, virtual_path: &'a str) -> Option<&'a str> {
    let head = virtual_path.get(..alias.len())?;
    if alias.is_empty() || !head.eq_ignore_ascii_case(alias) {
        return None;
    }
    let rest = &virtual_path[alias.len()..];
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}
