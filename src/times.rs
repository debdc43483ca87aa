//! Timestamp capture and restore.
//!
//! [`FileTimes`] snapshots the creation, access and modification times of a
//! file and writes them back onto another one. Creation time is optional:
//! it is only read where the platform reports it and only written on
//! Windows, where it can be set.

use filetime::FileTime;
use std::fs::Metadata;
use std::io;
use std::path::Path;

/// The timestamps carried over from a source file to its copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    /// Creation (birth) time, when the platform reports one
    pub created: Option<FileTime>,
    /// Last access time
    pub accessed: FileTime,
    /// Last modification time
    pub modified: FileTime,
}

impl FileTimes {
    /// Snapshot the timestamps held in `meta`.
    #[must_use]
    pub fn of(meta: &Metadata) -> Self {
        Self {
            created: FileTime::from_creation_time(meta),
            accessed: FileTime::from_last_access_time(meta),
            modified: FileTime::from_last_modification_time(meta),
        }
    }

    /// Write these timestamps onto the file at `path`.
    ///
    /// Only metadata is touched; the file contents are never reopened.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the timestamps cannot be set.
    pub fn apply(&self, path: &Path) -> io::Result<()> {
        apply_times(self, path)
    }
}

#[cfg(not(windows))]
fn apply_times(times: &FileTimes, path: &Path) -> io::Result<()> {
    filetime::set_file_times(path, times.accessed, times.modified)
}

/// Windows: open a handle with `FILE_WRITE_ATTRIBUTES` only and set all
/// three times through it.
#[cfg(windows)]
fn apply_times(times: &FileTimes, path: &Path) -> io::Result<()> {
    use std::fs::OpenOptions;
    use std::os::windows::fs::{FileTimesExt, OpenOptionsExt};
    use windows::Win32::Storage::FileSystem::FILE_WRITE_ATTRIBUTES;

    let handle = OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES.0)
        .open(path)?;

    let mut std_times = std::fs::FileTimes::new()
        .set_accessed(to_system_time(times.accessed))
        .set_modified(to_system_time(times.modified));
    if let Some(created) = times.created {
        std_times = std_times.set_created(to_system_time(created));
    }
    handle.set_times(std_times)
}

#[cfg(windows)]
fn to_system_time(ft: FileTime) -> std::time::SystemTime {
    use std::time::{Duration, UNIX_EPOCH};

    let secs = ft.unix_seconds();
    let nanos = Duration::from_nanos(u64::from(ft.nanoseconds()));
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs.unsigned_abs()) + nanos
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + nanos
    }
}
