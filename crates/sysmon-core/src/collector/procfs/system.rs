//! System-wide statistics from `/proc/` and `/etc/os-release`.

use std::path::Path;

use crate::collector::procfs::parser::{
    CpuTimeSample, GlobalStat, MemInfo, Uptime, parse_global_stat, parse_kernel_release,
    parse_meminfo, parse_os_release, parse_uptime,
};
use crate::collector::procfs::process::{CollectError, or_default};
use crate::collector::traits::FileSystem;
use crate::config::ProcPaths;
use crate::rates::SystemCpuState;

/// Reads whole-system metrics.
///
/// Every `read_*` method reports why a value is unavailable. The unprefixed
/// methods return the documented default instead (empty string, zero) and
/// log the cause at debug level.
#[derive(Debug, Clone)]
pub struct SystemStatsReader<F: FileSystem> {
    fs: F,
    paths: ProcPaths,
}

impl<F: FileSystem> SystemStatsReader<F> {
    /// Creates a new system reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `paths` - Locations of the files to read
    pub fn new(fs: F, paths: ProcPaths) -> Self {
        Self { fs, paths }
    }

    pub fn paths(&self) -> &ProcPaths {
        &self.paths
    }

    fn read_file(&self, path: &Path) -> Result<String, CollectError> {
        self.fs
            .read_to_string(path)
            .map_err(|e| CollectError::from_io(path, e))
    }

    fn read_stat(&self) -> Result<GlobalStat, CollectError> {
        let content = self.read_file(&self.paths.stat())?;
        Ok(parse_global_stat(&content)?)
    }

    /// Reads `PRETTY_NAME` from the OS release file.
    pub fn read_operating_system(&self) -> Result<String, CollectError> {
        let path = self.paths.os_release();
        let content = self.read_file(path)?;
        parse_os_release(&content).ok_or_else(|| CollectError::missing_field(path, "PRETTY_NAME"))
    }

    /// Reads the kernel release from `/proc/version`.
    pub fn read_kernel(&self) -> Result<String, CollectError> {
        let path = self.paths.version();
        let content = self.read_file(&path)?;
        parse_kernel_release(&content).ok_or_else(|| CollectError::missing_field(&path, "release"))
    }

    /// Lists process identifiers under the process root.
    ///
    /// Only directories whose whole name is decimal digits count. The order is
    /// whatever the filesystem enumerates.
    pub fn read_pids(&self) -> Result<Vec<u32>, CollectError> {
        let root = &self.paths.proc_root;
        let entries = self
            .fs
            .read_dir(root)
            .map_err(|e| CollectError::from_io(root, e))?;

        let pids = entries
            .iter()
            .filter_map(|entry| {
                let name = entry.file_name()?.to_str()?;
                if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                if !self.fs.is_dir(entry) {
                    return None;
                }
                name.parse::<u32>().ok()
            })
            .collect();

        Ok(pids)
    }

    /// Reads memory counters from `/proc/meminfo`.
    pub fn read_memory_info(&self) -> Result<MemInfo, CollectError> {
        let content = self.read_file(&self.paths.meminfo())?;
        Ok(parse_meminfo(&content)?)
    }

    /// Fraction of memory in use, `(total - free) / total`.
    pub fn read_memory_utilization(&self) -> Result<f64, CollectError> {
        self.read_memory_info()?
            .utilization()
            .ok_or(CollectError::Undefined("MemTotal is zero"))
    }

    /// Reads `/proc/uptime`.
    pub fn read_uptime(&self) -> Result<Uptime, CollectError> {
        let content = self.read_file(&self.paths.uptime())?;
        Ok(parse_uptime(&content)?)
    }

    /// Reads the aggregate `cpu` counters from `/proc/stat`.
    pub fn read_cpu_sample(&self) -> Result<CpuTimeSample, CollectError> {
        self.read_stat()?
            .cpu
            .ok_or_else(|| CollectError::missing_field(&self.paths.stat(), "cpu"))
    }

    /// Busy fraction since boot, from a single sample.
    pub fn read_cpu_utilization(&self) -> Result<f64, CollectError> {
        self.read_cpu_sample()?
            .utilization()
            .ok_or(CollectError::Undefined("no CPU ticks recorded"))
    }

    /// Busy fraction since the sample stored in `state`.
    ///
    /// The new sample replaces the stored one whether or not a rate could be
    /// computed. With no previous sample the single-sample ratio is returned.
    pub fn read_cpu_utilization_since(&self, state: &mut SystemCpuState) -> Result<f64, CollectError> {
        let sample = self.read_cpu_sample()?;
        let ratio = match state.prev.replace(sample) {
            Some(prev) => sample.utilization_since(&prev),
            None => sample.utilization(),
        };
        ratio.ok_or(CollectError::Undefined("no CPU ticks elapsed"))
    }

    /// Reads the `processes` counter (forks since boot).
    pub fn read_total_processes(&self) -> Result<u64, CollectError> {
        self.read_stat()?
            .processes
            .ok_or_else(|| CollectError::missing_field(&self.paths.stat(), "processes"))
    }

    /// Reads the `procs_running` counter.
    pub fn read_running_processes(&self) -> Result<u64, CollectError> {
        self.read_stat()?
            .procs_running
            .ok_or_else(|| CollectError::missing_field(&self.paths.stat(), "procs_running"))
    }

    /// Reads the `procs_blocked` counter.
    pub fn read_blocked_processes(&self) -> Result<u64, CollectError> {
        self.read_stat()?
            .procs_blocked
            .ok_or_else(|| CollectError::missing_field(&self.paths.stat(), "procs_blocked"))
    }

    /// Reads the boot time in seconds since the epoch.
    pub fn read_boot_time(&self) -> Result<u64, CollectError> {
        self.read_stat()?
            .btime
            .ok_or_else(|| CollectError::missing_field(&self.paths.stat(), "btime"))
    }

    // ---------------------------------------------------------------------
    // Default-on-failure API
    // ---------------------------------------------------------------------

    /// Pretty OS name, empty when unavailable.
    pub fn operating_system(&self) -> String {
        or_default(self.read_operating_system(), "operating_system")
    }

    /// Kernel release, empty when unavailable.
    pub fn kernel(&self) -> String {
        or_default(self.read_kernel(), "kernel")
    }

    /// Process identifiers, empty when the process root cannot be listed.
    pub fn pids(&self) -> Vec<u32> {
        or_default(self.read_pids(), "pids")
    }

    /// Memory utilization in `[0, 1]`, 0.0 when unavailable.
    pub fn memory_utilization(&self) -> f64 {
        or_default(self.read_memory_utilization(), "memory_utilization")
    }

    /// Whole seconds since boot, 0 when unavailable.
    pub fn uptime(&self) -> u64 {
        or_default(self.read_uptime().map(|u| u.uptime as u64), "uptime")
    }

    /// CPU utilization since boot in `[0, 1]`, 0.0 when unavailable.
    pub fn cpu_utilization(&self) -> f64 {
        or_default(self.read_cpu_utilization(), "cpu_utilization")
    }

    /// CPU utilization over the last interval in `[0, 1]`, 0.0 when unavailable.
    pub fn cpu_utilization_since(&self, state: &mut SystemCpuState) -> f64 {
        or_default(self.read_cpu_utilization_since(state), "cpu_utilization_since")
    }

    /// Forks since boot, 0 when unavailable.
    pub fn total_processes(&self) -> u64 {
        or_default(self.read_total_processes(), "total_processes")
    }

    /// Runnable processes, 0 when unavailable.
    pub fn running_processes(&self) -> u64 {
        or_default(self.read_running_processes(), "running_processes")
    }

    /// Processes blocked on I/O, 0 when unavailable.
    pub fn blocked_processes(&self) -> u64 {
        or_default(self.read_blocked_processes(), "blocked_processes")
    }

    /// Boot time in seconds since the epoch, 0 when unavailable.
    pub fn boot_time(&self) -> u64 {
        or_default(self.read_boot_time(), "boot_time")
    }
}
