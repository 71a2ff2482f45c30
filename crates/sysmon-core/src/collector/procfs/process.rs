//! Per-process statistics from `/proc/[pid]/` and the account database.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::procfs::parser::{
    ParseError, ProcStatus, ProcessCpuSample, lookup_user, parse_cmdline, parse_proc_stat,
    parse_proc_status,
};
use crate::collector::procfs::system::SystemStatsReader;
use crate::collector::traits::FileSystem;
use crate::config::ProcPaths;
use crate::rates::{ProcessCpuPoint, ProcessCpuState};

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// A system file is absent or unreadable.
    FileMissing(PathBuf),
    /// Process disappeared (or never existed); its files cannot be read.
    ProcessGone(u32),
    /// File was read but the expected key or field is not in it.
    MissingField { path: PathBuf, field: &'static str },
    /// A field is present but malformed.
    Parse(String),
    /// The metric has no meaningful value (zero total, no elapsed time).
    Undefined(&'static str),
    /// Any other I/O error.
    Io(std::io::Error),
}

impl CollectError {
    /// Classifies an I/O error on `path`.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                CollectError::FileMissing(path.to_path_buf())
            }
            _ => CollectError::Io(err),
        }
    }

    pub fn missing_field(path: &Path, field: &'static str) -> Self {
        CollectError::MissingField {
            path: path.to_path_buf(),
            field,
        }
    }
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::FileMissing(path) => write!(f, "cannot read {}", path.display()),
            CollectError::ProcessGone(pid) => write!(f, "process {} disappeared", pid),
            CollectError::MissingField { path, field } => {
                write!(f, "no {} in {}", field, path.display())
            }
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
            CollectError::Undefined(what) => write!(f, "undefined: {}", what),
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e.message)
    }
}

/// Collapses a failed read to the type's default, logging the cause.
pub(crate) fn or_default<T: Default>(result: Result<T, CollectError>, metric: &str) -> T {
    result.unwrap_or_else(|e| {
        debug!(metric, error = %e, "using default value");
        T::default()
    })
}

/// Maps a failed read under `/proc/[pid]/`.
///
/// Only a vanished file (`ENOENT`) or a vanished task (`ESRCH`, raised by some
/// files mid-read) means the process is gone.
fn process_read_error(pid: u32, path: &Path, err: std::io::Error) -> CollectError {
    const ESRCH: i32 = 3;
    if err.kind() == std::io::ErrorKind::NotFound || err.raw_os_error() == Some(ESRCH) {
        CollectError::ProcessGone(pid)
    } else {
        CollectError::from_io(path, err)
    }
}

/// Reads per-process metrics.
///
/// Holds its own [`SystemStatsReader`] over the same filesystem for the
/// system uptime that per-process CPU and age figures are normalized by.
#[derive(Debug, Clone)]
pub struct ProcessStatsReader<F: FileSystem + Clone> {
    fs: F,
    paths: ProcPaths,
    system: SystemStatsReader<F>,
}

impl<F: FileSystem + Clone> ProcessStatsReader<F> {
    /// Creates a new process reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `paths` - Locations of the files to read
    pub fn new(fs: F, paths: ProcPaths) -> Self {
        Self {
            system: SystemStatsReader::new(fs.clone(), paths.clone()),
            fs,
            paths,
        }
    }

    fn clock_ticks(&self) -> f64 {
        self.paths.clock_ticks as f64
    }

    /// Reads a file under `/proc/[pid]/`. Invalid UTF-8 (a `comm` or an
    /// argument can hold any bytes) is replaced with U+FFFD.
    fn read_process_file(&self, pid: u32, path: &Path) -> Result<String, CollectError> {
        let bytes = self
            .fs
            .read(path)
            .map_err(|e| process_read_error(pid, path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_status(&self, pid: u32) -> Result<ProcStatus, CollectError> {
        let content = self.read_process_file(pid, &self.paths.process_status(pid))?;
        Ok(parse_proc_status(&content))
    }

    /// Reads the first record of the command line, NUL separators intact.
    pub fn read_command(&self, pid: u32) -> Result<String, CollectError> {
        let content = self.read_process_file(pid, &self.paths.process_cmdline(pid))?;
        Ok(parse_cmdline(&content).to_string())
    }

    /// Reads the `Name:` field of the status file.
    pub fn read_process_name(&self, pid: u32) -> Result<String, CollectError> {
        self.read_status(pid)?
            .name
            .ok_or_else(|| CollectError::missing_field(&self.paths.process_status(pid), "Name"))
    }

    /// Reads `VmSize:` and converts it to whole megabytes.
    pub fn read_ram(&self, pid: u32) -> Result<u64, CollectError> {
        let vm_size = self
            .read_status(pid)?
            .vm_size
            .ok_or_else(|| CollectError::missing_field(&self.paths.process_status(pid), "VmSize"))?;
        if vm_size < 0 {
            return Err(CollectError::Parse(format!("negative VmSize {}", vm_size)));
        }
        Ok(vm_size as u64 / 1024)
    }

    /// Reads the real UID (first value of `Uid:`) as written.
    pub fn read_uid(&self, pid: u32) -> Result<String, CollectError> {
        self.read_status(pid)?
            .uid
            .ok_or_else(|| CollectError::missing_field(&self.paths.process_status(pid), "Uid"))
    }

    /// Resolves the owning account name through the account database.
    pub fn read_user(&self, pid: u32) -> Result<String, CollectError> {
        let uid = self.read_uid(pid)?;
        let passwd = self.paths.passwd();
        let content = self
            .fs
            .read_to_string(passwd)
            .map_err(|e| CollectError::from_io(passwd, e))?;
        lookup_user(&content, &uid).ok_or_else(|| CollectError::missing_field(passwd, "uid"))
    }

    /// Reads utime, stime, cutime, cstime and starttime from the stat file.
    pub fn read_cpu_sample(&self, pid: u32) -> Result<ProcessCpuSample, CollectError> {
        let content = self.read_process_file(pid, &self.paths.process_stat(pid))?;
        let stat = parse_proc_stat(&content)?;
        Ok(ProcessCpuSample::from(&stat))
    }

    /// Seconds after boot at which the process started.
    pub fn read_start_time(&self, pid: u32) -> Result<f64, CollectError> {
        let sample = self.read_cpu_sample(pid)?;
        Ok(sample.starttime as f64 / self.clock_ticks())
    }

    /// Process age in whole seconds: system uptime minus start time.
    pub fn read_uptime(&self, pid: u32) -> Result<u64, CollectError> {
        let start = self.read_start_time(pid)?;
        let uptime = self.system.read_uptime()?.uptime;
        Ok((uptime - start).max(0.0) as u64)
    }

    /// Average CPU percentage over the whole life of the process.
    ///
    /// `100 * (utime + stime) / hz / (uptime - starttime / hz)`. 100% is one
    /// fully busy core.
    pub fn read_cpu_utilization(&self, pid: u32) -> Result<f64, CollectError> {
        let point = self.read_cpu_point(pid)?;
        self.lifetime_percent(&point)
            .ok_or(CollectError::Undefined("process started at the current instant"))
    }

    /// CPU percentage since the sample stored for `pid` in `state`.
    ///
    /// Falls back to the lifetime average when there is no usable previous
    /// sample. The new sample always replaces the stored one.
    pub fn read_cpu_utilization_since(
        &self,
        pid: u32,
        state: &mut ProcessCpuState,
    ) -> Result<f64, CollectError> {
        let point = self.read_cpu_point(pid)?;
        if let Some(pct) = state.update(pid, point, self.paths.clock_ticks) {
            return Ok(pct);
        }
        self.lifetime_percent(&point)
            .ok_or(CollectError::Undefined("no time elapsed"))
    }

    fn read_cpu_point(&self, pid: u32) -> Result<ProcessCpuPoint, CollectError> {
        let sample = self.read_cpu_sample(pid)?;
        let uptime = self.system.read_uptime()?.uptime;
        Ok(ProcessCpuPoint { sample, uptime })
    }

    fn lifetime_percent(&self, point: &ProcessCpuPoint) -> Option<f64> {
        let hz = self.clock_ticks();
        let elapsed = point.uptime - point.sample.starttime as f64 / hz;
        if elapsed <= 0.0 {
            return None;
        }
        Some(100.0 * (point.sample.busy_ticks() as f64 / hz) / elapsed)
    }

    // ---------------------------------------------------------------------
    // Default-on-failure API
    // ---------------------------------------------------------------------

    /// Command line, empty when unavailable.
    pub fn command(&self, pid: u32) -> String {
        or_default(self.read_command(pid), "command")
    }

    /// Virtual memory size in megabytes as text, `"0"` when unavailable.
    pub fn ram(&self, pid: u32) -> String {
        or_default(self.read_ram(pid), "ram").to_string()
    }

    /// Short process name, empty when unavailable.
    pub fn process_name(&self, pid: u32) -> String {
        or_default(self.read_process_name(pid), "process_name")
    }

    /// Start time in seconds after boot, 0.0 when unavailable.
    pub fn start_time(&self, pid: u32) -> f64 {
        or_default(self.read_start_time(pid), "start_time")
    }

    /// Real UID as text, empty when unavailable.
    pub fn uid(&self, pid: u32) -> String {
        or_default(self.read_uid(pid), "uid")
    }

    /// Owning account name, empty when unavailable.
    pub fn user(&self, pid: u32) -> String {
        or_default(self.read_user(pid), "user")
    }

    /// Process age in seconds, 0 when unavailable.
    pub fn uptime(&self, pid: u32) -> u64 {
        or_default(self.read_uptime(pid), "process_uptime")
    }

    /// Lifetime CPU percentage, 0.0 when unavailable (including exited processes).
    pub fn cpu_utilization(&self, pid: u32) -> f64 {
        or_default(self.read_cpu_utilization(pid), "process_cpu_utilization")
    }

    /// Interval CPU percentage, 0.0 when unavailable.
    pub fn cpu_utilization_since(&self, pid: u32, state: &mut ProcessCpuState) -> f64 {
        or_default(
            self.read_cpu_utilization_since(pid, state),
            "process_cpu_utilization_since",
        )
    }
}
