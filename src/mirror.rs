//! Mirror runs: walk the source, fan out one copy task per file, wait.
//!
//! # Strategy
//!
//! 1. The walker runs inside a [`rayon::scope`] on a dedicated pool
//! 2. Each discovered file is spawned as its own task immediately
//! 3. A task compares, copies if needed, and records the outcome
//! 4. The scope returns once every spawned task has finished
//!
//! Tasks are independent failure domains: an error in one is logged and
//! counted, never propagated. The pool size caps how many files are open
//! at once.

use crate::compare::{Decision, should_copy};
use crate::config::Config;
use crate::copier::copy_file;
use crate::error::Result;
use crate::event_log::{Event, EventLog};
use crate::options::SyncOptions;
use crate::walk::{FileTask, walk};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Statistics from a mirror run.
///
/// Returned by [`Mirror::run`]. The process exit status never depends on
/// these numbers; they are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files discovered by the walker
    pub files_seen: u64,
    /// Files copied to the target
    pub files_copied: u64,
    /// Files left alone (up to date, or target not inspectable)
    pub files_skipped: u64,
    /// Files whose copy failed
    pub files_failed: u64,
    /// Total bytes written
    pub bytes_copied: u64,
    /// Why the walk stopped early, if it did
    pub walk_error: Option<String>,
    /// Wall time of the run
    pub duration: Duration,
}

/// What a run would do with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    /// The file would be copied
    Copy,
    /// The file would be left alone
    Skip,
}

impl PlanAction {
    /// Lowercase name used in plan output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlanAction::Copy => "copy",
            PlanAction::Skip => "skip",
        }
    }
}

/// One line of a dry-run plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    /// Source file
    pub source: PathBuf,
    /// Where it would be written
    pub target: PathBuf,
    /// Copy or skip
    pub action: PlanAction,
    /// Human-readable reason for the action
    pub reason: String,
}

#[derive(Default)]
struct Counters {
    seen: AtomicU64,
    copied: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    bytes: AtomicU64,
}

/// A one-way mirror from a source tree into a target tree.
///
/// # Example
///
/// ```no_run
/// use treemirror::{EventLog, Mirror, SyncOptions};
/// use std::path::Path;
///
/// let log = EventLog::open(Path::new("sync.log"))?;
/// let report = Mirror::new("photos", "/mnt/backup/photos", SyncOptions::default()).run(&log);
/// println!("Copied {} of {} files", report.files_copied, report.files_seen);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Mirror {
    source: PathBuf,
    target: PathBuf,
    options: SyncOptions,
}

impl Mirror {
    /// Create a mirror between two directories.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source: P, target: Q, options: SyncOptions) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            options,
        }
    }

    /// Create a mirror between the directories named in `config`.
    pub fn from_config(config: &Config, options: SyncOptions) -> Self {
        Self::new(&config.source_dir, &config.target_dir, options)
    }

    /// Source root
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Target root
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Run the mirror to completion, recording outcomes in `log`.
    ///
    /// Never fails: per-file errors are logged and counted, and a walk
    /// error stops discovery but still waits for the files already
    /// dispatched. A separator line is logged once everything finished.
    pub fn run(&self, log: &EventLog) -> SyncReport {
        let start_time = Instant::now();
        let counters = Counters::default();

        let walk_error = self.install(|| {
            rayon::scope(|s| {
                let counters = &counters;
                let walked = walk(&self.source, &self.options, |task| {
                    counters.seen.fetch_add(1, Ordering::Relaxed);
                    s.spawn(move |_| self.mirror_one(task, log, counters));
                });
                // Logged before the scope waits on tasks still in flight
                match walked {
                    Ok(()) => None,
                    Err(e) => {
                        log.record(&Event::WalkFailed(e.to_string()));
                        Some(e.to_string())
                    }
                }
            })
        });

        log.record(&Event::Separator);

        SyncReport {
            files_seen: counters.seen.into_inner(),
            files_copied: counters.copied.into_inner(),
            files_skipped: counters.skipped.into_inner(),
            files_failed: counters.failed.into_inner(),
            bytes_copied: counters.bytes.into_inner(),
            walk_error,
            duration: start_time.elapsed(),
        }
    }

    /// Work out what [`Mirror::run`] would do without writing anything.
    ///
    /// # Errors
    ///
    /// Returns the walk error if the source tree cannot be traversed.
    pub fn plan(&self) -> Result<Vec<PlanItem>> {
        let mut items = Vec::new();
        let mut relative_error = None;

        walk(&self.source, &self.options, |task| {
            if relative_error.is_some() {
                return;
            }
            let relative = match task.relative_to(&self.source) {
                Ok(relative) => relative,
                Err(e) => {
                    relative_error = Some(e);
                    return;
                }
            };
            let target = self.target.join(relative);
            let decision = should_copy(task.times.modified, &target);
            let action = if decision.should_copy() {
                PlanAction::Copy
            } else {
                PlanAction::Skip
            };
            items.push(PlanItem {
                source: task.source,
                target,
                action,
                reason: decision.to_string(),
            });
        })?;

        if let Some(e) = relative_error {
            return Err(e);
        }
        Ok(items)
    }

    /// Compare, copy and record a single file.
    fn mirror_one(&self, task: FileTask, log: &EventLog, counters: &Counters) {
        let relative = match task.relative_to(&self.source) {
            Ok(relative) => relative,
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                log.record(&Event::RelativePathFailed(e.to_string()));
                return;
            }
        };
        let target = self.target.join(relative);

        match should_copy(task.times.modified, &target) {
            Decision::Copy(_) => {
                let copied = copy_file(&task.source, &target, &task.times, &self.options);
                match copied {
                    Ok(bytes) => {
                        counters.copied.fetch_add(1, Ordering::Relaxed);
                        counters.bytes.fetch_add(bytes, Ordering::Relaxed);
                        let name = task
                            .source
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        log.record(&Event::Copied(name));
                    }
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        log.record(&Event::CopyFailed(e.to_string()));
                    }
                }
            }
            Decision::UpToDate => {
                counters.skipped.fetch_add(1, Ordering::Relaxed);
            }
            decision @ Decision::Unreadable(_) => {
                counters.skipped.fetch_add(1, Ordering::Relaxed);
                log.record(&Event::Skipped {
                    path: relative.to_path_buf(),
                    reason: decision.to_string(),
                });
            }
        }
    }

    /// Run `op` on a pool sized by `options.parallel`.
    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        // Use custom thread pool only if parallelism differs from default
        if self.options.parallel == rayon::current_num_threads() {
            return op();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.parallel)
            .build()
        {
            Ok(pool) => pool.install(op),
            Err(e) => {
                self.options.warn(&format!(
                    "Failed to create thread pool ({e}), using global pool"
                ));
                op()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
