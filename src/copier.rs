//! Single file copy.
//!
//! A copy creates any missing parent directories, streams the bytes, syncs
//! them to disk and finally stamps the source timestamps onto the target.
//! By default the bytes go to a temporary sibling that is renamed over the
//! target only once it is complete, so a failed copy leaves the previous
//! target (or nothing) in place.

use crate::error::{Error, Result};
use crate::options::SyncOptions;
use crate::times::FileTimes;
use std::fs::{self, File, Metadata};
use std::io;
use std::path::Path;

/// Prefix of the temporary files created next to targets during a copy.
pub(crate) const TEMP_PREFIX: &str = ".tmirror-";

/// Copy `src` to `dst` and give `dst` the timestamps in `times`.
///
/// Intermediate directories of `dst` are created as needed; creating one
/// that another copy created concurrently is not an error. An existing file
/// at `dst` is replaced but keeps its permissions. A symlink at `dst` is
/// written through, so the file it points to receives the new contents.
///
/// # Returns
///
/// The number of bytes written.
///
/// # Errors
///
/// Each step fails with its own variant:
/// [`Error::CreateDir`], [`Error::OpenSource`], [`Error::CreateTarget`],
/// [`Error::Stream`], [`Error::Sync`], [`Error::SetPermissions`],
/// [`Error::Persist`] and [`Error::SetTimes`].
pub fn copy_file(src: &Path, dst: &Path, times: &FileTimes, options: &SyncOptions) -> Result<u64> {
    let dst_parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // create_dir_all treats a directory that appears mid-call as success
    fs::create_dir_all(dst_parent).map_err(|source| Error::CreateDir {
        path: dst_parent.to_path_buf(),
        source,
    })?;

    let src_file = File::open(src).map_err(|source| Error::OpenSource {
        path: src.to_path_buf(),
        source,
    })?;

    let existing = fs::symlink_metadata(dst).ok();
    let through_link = existing.as_ref().is_some_and(|m| m.is_symlink());

    let bytes = if options.atomic && !through_link {
        let replaced = existing.as_ref().filter(|m| m.is_file());
        write_via_temp(&src_file, src, dst, dst_parent, replaced, options)?
    } else {
        // Renaming over a symlink would replace the link, not its target
        write_in_place(&src_file, src, dst, options)?
    };

    times.apply(dst).map_err(|source| Error::SetTimes {
        path: dst.to_path_buf(),
        source,
    })?;

    Ok(bytes)
}

fn write_via_temp(
    src_file: &File,
    src: &Path,
    dst: &Path,
    dst_parent: &Path,
    replaced: Option<&Metadata>,
    options: &SyncOptions,
) -> Result<u64> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode a freshly created file would get (umask still applies)
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp_file = builder
        .tempfile_in(dst_parent)
        .map_err(|source| Error::CreateTarget {
            path: dst_parent.to_path_buf(),
            source,
        })?;
    let dst_file = temp_file.as_file();

    let bytes = copy_file_contents(src_file, dst_file).map_err(|source| Error::Stream {
        path: src.to_path_buf(),
        source,
    })?;

    if options.fsync {
        dst_file.sync_all().map_err(|source| Error::Sync {
            path: dst.to_path_buf(),
            source,
        })?;
    }

    // The replaced file keeps its mode
    if let Some(replaced) = replaced {
        let perms = replaced.permissions();
        fs::set_permissions(temp_file.path(), perms).map_err(|source| Error::SetPermissions {
            path: dst.to_path_buf(),
            source,
        })?;
    }

    // Dropping the temp file on any error above removes it
    let persisted = temp_file.persist(dst).map_err(|e| Error::Persist {
        path: dst.to_path_buf(),
        source: e.error,
    })?;
    drop(persisted);

    Ok(bytes)
}

fn write_in_place(src_file: &File, src: &Path, dst: &Path, options: &SyncOptions) -> Result<u64> {
    let dst_file = File::create(dst).map_err(|source| Error::CreateTarget {
        path: dst.to_path_buf(),
        source,
    })?;

    let bytes = copy_file_contents(src_file, &dst_file).map_err(|source| Error::Stream {
        path: src.to_path_buf(),
        source,
    })?;

    if options.fsync {
        dst_file.sync_all().map_err(|source| Error::Sync {
            path: dst.to_path_buf(),
            source,
        })?;
    }

    Ok(bytes)
}

/// Copy all remaining bytes of `src` into `dst`.
///
/// On Linux this uses `copy_file_range` so data never enters userspace.
/// Elsewhere, or when the kernel refuses, it falls back to `std::io::copy`.
pub(crate) fn copy_file_contents(src: &File, dst: &File) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        copy_file_range_all(src, dst)
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::io::BufReader;
        io::copy(&mut BufReader::new(src), &mut &*dst)
    }
}

/// Linux-specific: copy using copy_file_range(2) until EOF.
///
/// Reading to EOF rather than to a precomputed length means a source that
/// grows between the walk and the copy is still copied whole.
#[cfg(target_os = "linux")]
fn copy_file_range_all(src: &File, dst: &File) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    const CHUNK_SIZE: usize = 128 * 1024 * 1024;

    let src_fd = src.as_raw_fd();
    let dst_fd = dst.as_raw_fd();
    let mut copied: u64 = 0;

    loop {
        // SAFETY: both descriptors are open for the duration of the call and
        // null offsets make the kernel use (and advance) the file positions.
        let result = unsafe {
            libc::copy_file_range(
                src_fd,
                std::ptr::null_mut(),
                dst_fd,
                std::ptr::null_mut(),
                CHUNK_SIZE,
                0,
            )
        };

        if result < 0 {
            let err = io::Error::last_os_error();
            // EXDEV: cross-device, ENOSYS: not supported, EINVAL: fs doesn't support it
            if copied == 0
                && matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV | libc::ENOSYS | libc::EINVAL | libc::EOPNOTSUPP)
                )
            {
                use std::io::BufReader;
                return io::copy(&mut BufReader::new(src), &mut &*dst);
            }
            return Err(err);
        }

        if result == 0 {
            break;
        }

        copied += result as u64;
    }

    Ok(copied)
}

// =============================================================================
// Tests
// =============================================================================
