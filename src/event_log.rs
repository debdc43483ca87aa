//! Append-only audit log of copy outcomes.
//!
//! Every line has the form `<RFC 3339 timestamp> - <message>`. Writers on
//! different threads share one [`EventLog`]; a single mutex around the
//! timestamp + append keeps lines whole. The log is for humans only and is
//! never read back.

use chrono::{Local, SecondsFormat};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Line written after the last event of a run.
pub const SEPARATOR: &str = "--------------------";

/// Something worth recording in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A file was copied; carries its base file name
    Copied(String),
    /// A file could not be copied
    CopyFailed(String),
    /// A walked path could not be made relative to the source root
    RelativePathFailed(String),
    /// Traversal of the source tree stopped
    WalkFailed(String),
    /// A file was left alone because its target could not be inspected
    Skipped {
        /// Path relative to the roots
        path: PathBuf,
        /// Why the target could not be inspected
        reason: String,
    },
    /// End of run
    Separator,
}

impl Event {
    /// Whether this event reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Event::CopyFailed(_) | Event::RelativePathFailed(_) | Event::WalkFailed(_)
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Copied(name) => write!(f, "Copied: {name}"),
            Event::CopyFailed(detail) => write!(f, "Error copying file: {detail}"),
            Event::RelativePathFailed(detail) => write!(f, "Error getting relative path: {detail}"),
            Event::WalkFailed(detail) => write!(f, "Error walking the path: {detail}"),
            Event::Skipped { path, reason } => write!(f, "Skipped: {} ({reason})", path.display()),
            Event::Separator => f.write_str(SEPARATOR),
        }
    }
}

/// Shared, serialized audit log sink.
///
/// Owned by whoever starts a run and lent to every copy task. Write errors
/// are swallowed: recording an event never fails the operation it
/// describes.
pub struct EventLog {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}

impl EventLog {
    /// Open (or create) the log file at `path` in append mode.
    ///
    /// # Errors
    ///
    /// Returns the IO error if the file cannot be opened for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file: File = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    /// Log into an arbitrary writer.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
        }
    }

    /// A log that drops every event.
    #[must_use]
    pub fn discard() -> Self {
        Self::from_writer(io::sink())
    }

    /// Append one timestamped line for `event`.
    pub fn record(&self, event: &Event) {
        #[cfg(feature = "tracing")]
        if event.is_error() {
            tracing::error!("{event}");
        } else {
            tracing::debug!("{event}");
        }

        // A writer that panicked mid-line leaves nothing we can't append after
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let line = format!(
            "{} - {event}\n",
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let written = sink.write_all(line.as_bytes()).and_then(|()| sink.flush());
        drop(sink);

        if let Err(_e) = written {
            #[cfg(feature = "tracing")]
            tracing::warn!("Failed to write audit log: {}", _e);
        }
    }
}
