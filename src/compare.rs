//! Change detection between a source file and its target.
//!
//! Freshness is decided by modification time alone. Size and content are
//! never compared, so an edit that keeps the same mtime goes unnoticed.

use filetime::FileTime;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Why a file is going to be copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyReason {
    /// Nothing exists at the target path
    Missing,
    /// Source mtime is strictly after target mtime
    Newer,
}

/// Outcome of comparing a source file against its target path.
#[derive(Debug)]
pub enum Decision {
    /// The target must be (re)written
    Copy(CopyReason),
    /// The target is at least as new as the source
    UpToDate,
    /// The target could not be inspected; it is left alone
    Unreadable(io::Error),
}

impl Decision {
    /// Whether this decision leads to a copy.
    #[must_use]
    pub fn should_copy(&self) -> bool {
        matches!(self, Decision::Copy(_))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Copy(CopyReason::Missing) => f.write_str("target missing"),
            Decision::Copy(CopyReason::Newer) => f.write_str("source newer"),
            Decision::UpToDate => f.write_str("up to date"),
            Decision::Unreadable(e) => write!(f, "cannot stat target: {e}"),
        }
    }
}

/// Decide whether the file with `source_mtime` must be copied to `target`.
///
/// The target is stat-ed fresh on every call (following symlinks), so the
/// answer reflects the target as it is now, not as it was when the walk
/// started.
pub fn should_copy(source_mtime: FileTime, target: &Path) -> Decision {
    match fs::metadata(target) {
        Ok(target_meta) => {
            let target_mtime = FileTime::from_last_modification_time(&target_meta);
            if is_source_newer(source_mtime, target_mtime) {
                Decision::Copy(CopyReason::Newer)
            } else {
                Decision::UpToDate
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Decision::Copy(CopyReason::Missing),
        Err(e) => Decision::Unreadable(e),
    }
}

/// Strictly-after comparison; equal timestamps are not newer.
#[inline]
pub(crate) fn is_source_newer(source_mtime: FileTime, target_mtime: FileTime) -> bool {
    source_mtime > target_mtime
}
