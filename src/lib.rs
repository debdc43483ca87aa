//! # treemirror
//!
//! One-way directory mirroring: copy every file that is missing or stale in
//! a target tree from a source tree, preserving timestamps.
//!
//! ## Core Features
//!
//! - **Modification-time freshness**: a file is copied when the target is
//!   missing or strictly older than the source; nothing is ever deleted
//! - **One task per file**: every discovered file is copied by its own
//!   rayon task on a bounded pool, and one failing file never affects another
//! - **Atomic writes**: contents go to a temp file that is synced and then
//!   renamed over the target, so failed copies leave no partial files
//! - **Timestamp preserving**: modification and access times are copied
//!   everywhere, creation time too on Windows
//! - **Audit log**: an append-only, timestamped record of every copy and error
//!
//! ## Quick Start
//!
//! ```no_run
//! use treemirror::{Config, EventLog, Mirror, SyncOptions};
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("config.json"))?;
//! let log = EventLog::open(Path::new("sync.log"))?;
//!
//! let report = Mirror::from_config(&config, SyncOptions::default()).run(&log);
//! println!("Copied {} files ({} bytes)", report.files_copied, report.bytes_copied);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Dry Run
//!
//! ```no_run
//! use treemirror::{Mirror, PlanAction, SyncOptions};
//!
//! for item in Mirror::new("src", "dst", SyncOptions::default()).plan()? {
//!     if item.action == PlanAction::Copy {
//!         println!("{} ({})", item.source.display(), item.reason);
//!     }
//! }
//! # Ok::<(), treemirror::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured diagnostics with the tracing crate |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod compare;
mod config;
mod copier;
mod error;
mod event_log;
mod mirror;
mod options;
mod times;
mod walk;

pub use compare::{CopyReason, Decision, should_copy};
pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use copier::copy_file;
pub use error::{Error, Result};
pub use event_log::{Event, EventLog, SEPARATOR};
pub use mirror::{Mirror, PlanAction, PlanItem, SyncReport};
pub use options::SyncOptions;
pub use times::FileTimes;
pub use walk::{FileTask, walk};

pub use filetime::FileTime;
