//! Source locations for the readers.
//!
//! Both readers resolve every file through a [`ProcPaths`] instead of
//! hardcoded constants, so tests can point them at a synthetic tree.

use std::path::{Path, PathBuf};

/// Scheduler ticks per second (USER_HZ). Fixed at 100 on all mainstream Linux ABIs.
pub const DEFAULT_CLOCK_TICKS: u64 = 100;

/// Root path, filename table and tick frequency used by the readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcPaths {
    /// Process information root (usually `/proc`).
    pub proc_root: PathBuf,
    /// OS release description (usually `/etc/os-release`).
    pub os_release: PathBuf,
    /// Account database (usually `/etc/passwd`).
    pub passwd: PathBuf,
    pub version_file: String,
    pub meminfo_file: String,
    pub uptime_file: String,
    pub stat_file: String,
    pub cmdline_file: String,
    pub status_file: String,
    /// Clock ticks per second used to convert stat tick counters to seconds.
    pub clock_ticks: u64,
}

impl Default for ProcPaths {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            os_release: PathBuf::from("/etc/os-release"),
            passwd: PathBuf::from("/etc/passwd"),
            version_file: "version".to_string(),
            meminfo_file: "meminfo".to_string(),
            uptime_file: "uptime".to_string(),
            stat_file: "stat".to_string(),
            cmdline_file: "cmdline".to_string(),
            status_file: "status".to_string(),
            clock_ticks: DEFAULT_CLOCK_TICKS,
        }
    }
}

impl ProcPaths {
    /// Creates the standard layout rooted at `/proc`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the process information root.
    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Replaces the OS release file path.
    pub fn with_os_release(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release = path.into();
        self
    }

    /// Replaces the account database path.
    pub fn with_passwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.passwd = path.into();
        self
    }

    /// Replaces the clock tick frequency. Zero is ignored.
    pub fn with_clock_ticks(mut self, ticks: u64) -> Self {
        if ticks > 0 {
            self.clock_ticks = ticks;
        }
        self
    }

    pub fn version(&self) -> PathBuf {
        self.proc_root.join(&self.version_file)
    }

    pub fn meminfo(&self) -> PathBuf {
        self.proc_root.join(&self.meminfo_file)
    }

    pub fn uptime(&self) -> PathBuf {
        self.proc_root.join(&self.uptime_file)
    }

    pub fn stat(&self) -> PathBuf {
        self.proc_root.join(&self.stat_file)
    }

    /// Directory holding the files of one process.
    pub fn process_dir(&self, pid: u32) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }

    pub fn process_stat(&self, pid: u32) -> PathBuf {
        self.process_dir(pid).join(&self.stat_file)
    }

    pub fn process_status(&self, pid: u32) -> PathBuf {
        self.process_dir(pid).join(&self.status_file)
    }

    pub fn process_cmdline(&self, pid: u32) -> PathBuf {
        self.process_dir(pid).join(&self.cmdline_file)
    }

    pub fn os_release(&self) -> &Path {
        &self.os_release
    }

    pub fn passwd(&self) -> &Path {
        &self.passwd
    }
}
