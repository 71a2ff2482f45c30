//! Snapshot value types handed to the display layer.
//!
//! One [`Snapshot`] is one complete point-in-time view of the system. All
//! strings are already rendered and all rates already computed.

use std::cmp::Ordering;

use serde::Serialize;

/// Top-level snapshot produced by one collection pass.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Unix timestamp (seconds since epoch).
    pub timestamp: i64,
    pub system: SystemSnapshot,
    /// Processes ordered by pid.
    pub processes: Vec<ProcessSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub operating_system: String,
    pub kernel: String,
    /// Seconds since boot.
    pub uptime: u64,
    /// Fraction of memory in use, `[0, 1]`.
    pub memory_utilization: f64,
    /// Fraction of CPU time busy, `[0, 1]`. Over the last interval once a
    /// previous sample exists, since boot otherwise.
    pub cpu_utilization: f64,
    pub total_processes: u64,
    pub running_processes: u64,
    pub blocked_processes: u64,
}

/// One process row.
///
/// Equality and ordering compare the pid only.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub user: String,
    /// Command line with argument separators rendered as spaces.
    pub command: String,
    /// Virtual memory size in megabytes.
    pub ram_mb: u64,
    /// Process age in seconds.
    pub uptime: u64,
    /// CPU percentage; 100 is one fully busy core.
    pub cpu_percent: f64,
}

impl PartialEq for ProcessSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.pid == other.pid
    }
}

impl Eq for ProcessSnapshot {}

impl PartialOrd for ProcessSnapshot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProcessSnapshot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pid.cmp(&other.pid)
    }
}

impl Snapshot {
    /// Processes sorted by CPU percentage, busiest first; ties by pid.
    pub fn processes_by_cpu(&self) -> Vec<&ProcessSnapshot> {
        let mut rows: Vec<&ProcessSnapshot> = self.processes.iter().collect();
        rows.sort_by(|a, b| {
            b.cpu_percent
                .total_cmp(&a.cpu_percent)
                .then_with(|| a.pid.cmp(&b.pid))
        });
        rows
    }
}
