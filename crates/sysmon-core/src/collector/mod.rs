//! System and process statistics for Linux.
//!
//! Reads the `/proc` filesystem and the account database through a
//! [`FileSystem`] seam, so everything can be driven by [`MockFs`] in tests.
//!
//! # Architecture
//!
//! ```text
//!   Collector ── owns SystemCpuState + ProcessCpuState
//!     ├── SystemStatsReader   /proc/{meminfo,stat,uptime,version}, os-release
//!     └── ProcessStatsReader  /proc/[pid]/{stat,status,cmdline}, passwd
//!               │
//!          FileSystem (trait)
//!           ├── RealFs   std::fs
//!           └── MockFs   in-memory tree + scenarios
//! ```
//!
//! # Usage
//!
//! ```
//! use sysmon_core::collector::{Collector, MockFs};
//! use sysmon_core::config::ProcPaths;
//!
//! let mut collector = Collector::new(MockFs::typical_system(), ProcPaths::default());
//! let snapshot = collector.collect_snapshot().unwrap();
//! assert_eq!(snapshot.system.kernel, "6.5.0-14-generic");
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use collector::Collector;
pub use mock::MockFs;
pub use procfs::{CollectError, ProcessStatsReader, SystemStatsReader};
pub use traits::{FileSystem, RealFs};
