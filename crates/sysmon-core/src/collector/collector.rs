//! Main collector that combines the system and process readers.
//!
//! The `Collector` owns the rate state between polls and turns one pass over
//! `/proc` into a [`Snapshot`].

use std::collections::HashSet;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{trace, warn};

use crate::collector::procfs::process::or_default;
use crate::collector::procfs::{CollectError, ProcessStatsReader, SystemStatsReader};
use crate::collector::traits::FileSystem;
use crate::config::ProcPaths;
use crate::fmt::normalize_command;
use crate::models::{ProcessSnapshot, Snapshot, SystemSnapshot};
use crate::rates::{ProcessCpuState, SystemCpuState};

/// Gathers system and per-process metrics into snapshots.
///
/// CPU figures are interval rates once a previous pass has been made and
/// cumulative averages on the first pass.
pub struct Collector<F: FileSystem + Clone> {
    system: SystemStatsReader<F>,
    process: ProcessStatsReader<F>,
    system_cpu: SystemCpuState,
    process_cpu: ProcessCpuState,
    /// Duration of the last collect_snapshot call.
    last_duration: Option<Duration>,
}

impl<F: FileSystem + Clone> Collector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `paths` - Locations of the files to read
    pub fn new(fs: F, paths: ProcPaths) -> Self {
        Self {
            system: SystemStatsReader::new(fs.clone(), paths.clone()),
            process: ProcessStatsReader::new(fs, paths),
            system_cpu: SystemCpuState::default(),
            process_cpu: ProcessCpuState::default(),
            last_duration: None,
        }
    }

    pub fn system_reader(&self) -> &SystemStatsReader<F> {
        &self.system
    }

    pub fn process_reader(&self) -> &ProcessStatsReader<F> {
        &self.process
    }

    /// Returns how long the last collection pass took.
    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }

    /// Forgets previous samples; the next pass reports cumulative figures.
    pub fn reset_rates(&mut self) {
        self.system_cpu.reset();
        self.process_cpu.reset();
    }

    /// Collects one snapshot.
    ///
    /// Fails only when the process root cannot be listed. Every other
    /// unavailable metric takes its default; processes that exit during the
    /// pass are left out.
    pub fn collect_snapshot(&mut self) -> Result<Snapshot, CollectError> {
        let start = Instant::now();

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let pids = self.system.read_pids()?;
        let system = self.collect_system();

        let mut processes = Vec::with_capacity(pids.len());
        for pid in pids {
            match self.collect_process(pid) {
                Ok(process) => processes.push(process),
                Err(CollectError::ProcessGone(pid)) => {
                    trace!(pid, "process exited during collection");
                }
                Err(e) => {
                    warn!(pid, error = %e, "failed to collect process");
                }
            }
        }
        processes.sort();

        let live: HashSet<u32> = processes.iter().map(|p| p.pid).collect();
        self.process_cpu.retain_pids(&live);

        let elapsed = start.elapsed();
        self.last_duration = Some(elapsed);
        trace!(
            processes = processes.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "snapshot collected"
        );

        Ok(Snapshot {
            timestamp,
            system,
            processes,
        })
    }

    fn collect_system(&mut self) -> SystemSnapshot {
        SystemSnapshot {
            operating_system: self.system.operating_system(),
            kernel: self.system.kernel(),
            uptime: self.system.uptime(),
            memory_utilization: self.system.memory_utilization(),
            cpu_utilization: self.system.cpu_utilization_since(&mut self.system_cpu),
            total_processes: self.system.total_processes(),
            running_processes: self.system.running_processes(),
            blocked_processes: self.system.blocked_processes(),
        }
    }

    /// Only [`CollectError::ProcessGone`] drops the row; any other failed
    /// metric takes its default.
    fn collect_process(&mut self, pid: u32) -> Result<ProcessSnapshot, CollectError> {
        let cpu_percent = match self
            .process
            .read_cpu_utilization_since(pid, &mut self.process_cpu)
        {
            Err(e @ CollectError::ProcessGone(_)) => return Err(e),
            result => or_default(result, "process_cpu_utilization"),
        };
        let command = match self.process.read_command(pid) {
            Err(e @ CollectError::ProcessGone(_)) => return Err(e),
            result => normalize_command(&or_default(result, "command")),
        };

        Ok(ProcessSnapshot {
            pid,
            user: self.process.user(pid),
            command,
            ram_mb: or_default(self.process.read_ram(pid), "ram"),
            uptime: self.process.uptime(pid),
            cpu_percent,
        })
    }
}
