//! Configuration options for mirror runs.
//!
//! This module provides [`SyncOptions`] for tuning how a run copies files.
//! What to copy is decided by modification time alone and is not
//! configurable.
//!
//! # Example
//!
//! ```
//! use treemirror::SyncOptions;
//!
//! let options = SyncOptions::default()
//!     .with_parallel(8)
//!     .without_fsync();
//! ```

/// Options for a mirror run.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `parallel` | 16 | Files copied concurrently |
/// | `fsync` | `true` | Sync target contents to disk before finishing |
/// | `atomic` | `true` | Write to a temp file, then rename over the target |
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Number of files copied at the same time (default: 16)
    ///
    /// Every discovered file becomes its own task, but at most this many
    /// run at once, which caps the number of open file handles.
    pub parallel: usize,

    /// Whether to sync target files to disk after writing (default: true)
    pub fsync: bool,

    /// Whether to write through a temporary file (default: true)
    ///
    /// When enabled, a failed copy never leaves a truncated target behind.
    /// When disabled, the target is truncated and written in place.
    pub atomic: bool,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    pub warn_handler: Option<fn(&str)>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            parallel: 16,
            fsync: true,
            atomic: true,
            warn_handler: None,
        }
    }
}

impl SyncOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Set the number of files copied concurrently
    ///
    /// Value is clamped to at least 1 to prevent panics.
    #[must_use]
    pub fn with_parallel(mut self, n: usize) -> Self {
        self.parallel = n.max(1);
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Truncate and write targets in place instead of renaming a temp file
    #[must_use]
    pub fn in_place(mut self) -> Self {
        self.atomic = false;
        self
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}
