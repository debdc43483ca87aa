//! Source tree traversal.
//!
//! The walker visits the source tree depth-first and hands every regular
//! file to a callback as a [`FileTask`]. Directories are descended into but
//! never handed out. The first traversal error stops the walk and is
//! returned; nothing is skipped silently.

use crate::error::{Error, Result};
use crate::options::SyncOptions;
use crate::times::FileTimes;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

/// One file discovered under the source root.
///
/// Created once per file per run and consumed by exactly one copy task.
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Full path of the source file
    pub source: PathBuf,
    /// Timestamps captured when the file was walked
    pub times: FileTimes,
    /// Size in bytes when the file was walked
    pub len: u64,
}

impl FileTask {
    fn new(source: PathBuf, meta: &Metadata) -> Self {
        Self {
            source,
            times: FileTimes::of(meta),
            len: meta.len(),
        }
    }

    /// Path of this file relative to the source `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelativePath`] if the file is not under `root`.
    pub fn relative_to(&self, root: &Path) -> Result<&Path> {
        self.source
            .strip_prefix(root)
            .map_err(|_| Error::RelativePath {
                path: self.source.clone(),
                root: root.to_path_buf(),
            })
    }
}

/// Walk `root` and call `visit` for every file below it.
///
/// Symlinks to files are followed and reported with the metadata of the
/// file they point to. Symlinks to directories and special files (sockets,
/// FIFOs, devices) are skipped with a warning. Visiting order follows the
/// directory listing order of the platform and must not be relied on.
///
/// # Errors
///
/// - [`Error::SourceNotFound`] if `root` does not exist
/// - [`Error::NotADirectory`] if `root` is not a directory
/// - [`Error::Walk`] for the first entry that cannot be listed or stat-ed,
///   including broken symlinks
pub fn walk<F>(root: &Path, options: &SyncOptions, mut visit: F) -> Result<()>
where
    F: FnMut(FileTask),
{
    let root_meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::SourceNotFound(root.to_path_buf()));
        }
        Err(source) => {
            return Err(Error::Walk {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    if !root_meta.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| Error::Walk {
            path: dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| Error::Walk {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();

            // file_type does not follow links, so symlinks land in their own branch
            let file_type = entry.file_type().map_err(|source| Error::Walk {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let meta = entry.metadata().map_err(|source| Error::Walk {
                    path: path.clone(),
                    source,
                })?;
                visit(FileTask::new(path, &meta));
            } else if file_type.is_symlink() {
                let meta = fs::metadata(&path).map_err(|source| Error::Walk {
                    path: path.clone(),
                    source,
                })?;
                if meta.is_file() {
                    visit(FileTask::new(path, &meta));
                } else {
                    options.warn(&format!("Skipping symlink to non-file: {}", path.display()));
                }
            } else {
                options.warn(&format!("Skipping special file: {}", path.display()));
            }
        }
    }

    Ok(())
}
