//! Error types for treemirror.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur while loading configuration, walking the source tree, or
//! copying a single file, and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Startup | [`Error::ConfigRead`], [`Error::ConfigParse`], [`Error::ConfigMissing`] |
//! | Run-aborting | [`Error::SourceNotFound`], [`Error::NotADirectory`], [`Error::Walk`] |
//! | Per-file | [`Error::RelativePath`], [`Error::CreateDir`], [`Error::OpenSource`], [`Error::CreateTarget`], [`Error::Stream`], [`Error::Sync`], [`Error::SetPermissions`], [`Error::SetTimes`], [`Error::Persist`] |
//!
//! Each step of a file copy maps to its own variant so the audit log says
//! exactly where a copy stopped.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for treemirror operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a mirror run.
///
/// All errors include relevant path information to aid debugging.
/// Use the [`std::error::Error`] trait methods to access underlying
/// causes where applicable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Configuration file is not valid JSON
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// A required configuration field is missing or empty
    #[error("Config field `{field}` must be specified")]
    ConfigMissing {
        /// Name of the missing field
        field: &'static str,
    },

    /// Source root does not exist
    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// Source root is not a directory
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Traversal of the source tree failed
    #[error("{path}: {source}")]
    Walk {
        /// Entry where traversal failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A walked path does not live under the source root
    #[error("{path} is not under {root}")]
    RelativePath {
        /// Walked path
        path: PathBuf,
        /// Source root
        root: PathBuf,
    },

    /// Failed to create an intermediate target directory
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to open the source file for reading
    #[error("Failed to open source {path}: {source}")]
    OpenSource {
        /// Source file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create the target file (or its temporary sibling)
    #[error("Failed to create target {path}: {source}")]
    CreateTarget {
        /// Target path, or the directory the temporary file was created in
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed while streaming bytes from source to target
    #[error("Failed to copy contents of {path}: {source}")]
    Stream {
        /// Source file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to flush target contents to stable storage
    #[error("Failed to sync {path}: {source}")]
    Sync {
        /// Target file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to carry the replaced target's permissions over to the new file
    #[error("Failed to set permissions on {path}: {source}")]
    SetPermissions {
        /// Target file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to apply source timestamps to the target
    #[error("Failed to set timestamps on {path}: {source}")]
    SetTimes {
        /// Target file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to rename the temporary file over the target
    #[error("Failed to persist temporary file to {path}: {source}")]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}
