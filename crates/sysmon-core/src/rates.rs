//! Caller-owned state for interval CPU rates.
//!
//! Kernel CPU counters are cumulative, so a rate needs the previous sample.
//! The readers never keep one themselves: the caller owns a state value and
//! passes it in by `&mut` on every poll.

use std::collections::{HashMap, HashSet};

use crate::collector::procfs::parser::{CpuTimeSample, ProcessCpuSample};

// ---------------------------------------------------------------------------
// Delta helpers
// ---------------------------------------------------------------------------

/// Compute u64 delta, returning `None` on counter regression.
pub fn du64(curr: u64, prev: u64) -> Option<u64> {
    curr.checked_sub(prev)
}

/// Compute f64 delta, returning `None` unless time moved forward.
pub fn df64_positive(curr: f64, prev: f64) -> Option<f64> {
    let d = curr - prev;
    (d > 0.0).then_some(d)
}

// ---------------------------------------------------------------------------
// Rate state structs
// ---------------------------------------------------------------------------

/// Previous aggregate CPU sample for system-wide rates.
#[derive(Debug, Default, Clone)]
pub struct SystemCpuState {
    pub prev: Option<CpuTimeSample>,
}

impl SystemCpuState {
    pub fn reset(&mut self) {
        self.prev = None;
    }
}

/// One per-process observation: CPU counters plus system uptime at read time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessCpuPoint {
    pub sample: ProcessCpuSample,
    pub uptime: f64,
}

/// Previous per-process samples for per-process rates, keyed by pid.
#[derive(Debug, Default, Clone)]
pub struct ProcessCpuState {
    pub prev_sample: HashMap<u32, ProcessCpuPoint>,
}

impl ProcessCpuState {
    pub fn reset(&mut self) {
        self.prev_sample.clear();
    }

    /// Drops samples of processes that are no longer present.
    pub fn retain_pids(&mut self, live: &HashSet<u32>) {
        self.prev_sample.retain(|pid, _| live.contains(pid));
    }

    pub fn len(&self) -> usize {
        self.prev_sample.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prev_sample.is_empty()
    }

    /// Stores `curr` for `pid` and returns the CPU percentage since the
    /// previously stored point.
    ///
    /// `None` on the first observation, when the pid was reused by a new
    /// process (different starttime), or when no time elapsed.
    pub fn update(&mut self, pid: u32, curr: ProcessCpuPoint, clock_ticks: u64) -> Option<f64> {
        let prev = self.prev_sample.insert(pid, curr)?;
        cpu_percent_between(&prev, &curr, clock_ticks)
    }
}

/// CPU percentage used by one process between two observations.
///
/// 100% is one fully busy core.
pub fn cpu_percent_between(
    prev: &ProcessCpuPoint,
    curr: &ProcessCpuPoint,
    clock_ticks: u64,
) -> Option<f64> {
    if prev.sample.starttime != curr.sample.starttime || clock_ticks == 0 {
        return None;
    }
    let ticks = du64(curr.sample.busy_ticks(), prev.sample.busy_ticks())?;
    let elapsed = df64_positive(curr.uptime, prev.uptime)?;
    Some(100.0 * (ticks as f64 / clock_ticks as f64) / elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(utime: u64, stime: u64, starttime: u64, uptime: f64) -> ProcessCpuPoint {
        ProcessCpuPoint {
            sample: ProcessCpuSample {
                utime,
                stime,
                cutime: 0,
                cstime: 0,
                starttime,
            },
            uptime,
        }
    }

    #[test]
    fn test_delta_helpers() {
        assert_eq!(du64(10, 4), Some(6));
        assert_eq!(du64(4, 10), None);
        assert_eq!(df64_positive(2.5, 1.0), Some(1.5));
        assert_eq!(df64_positive(1.0, 1.0), None);
    }

    #[test]
    fn test_cpu_percent_between() {
        let prev = point(1000, 500, 100, 50.0);
        let curr = point(1150, 550, 100, 52.0);
        // 200 ticks = 2s of CPU over 2s of wall time
        assert_eq!(cpu_percent_between(&prev, &curr, 100), Some(100.0));
    }

    #[test]
    fn test_cpu_percent_between_rejects_reused_pid_and_stalled_clock() {
        let prev = point(1000, 500, 100, 50.0);
        assert_eq!(cpu_percent_between(&prev, &point(10, 5, 900, 60.0), 100), None);
        assert_eq!(cpu_percent_between(&prev, &point(1100, 500, 100, 50.0), 100), None);
        assert_eq!(cpu_percent_between(&prev, &point(900, 500, 100, 60.0), 100), None);
    }

    #[test]
    fn test_process_state_update_and_retain() {
        let mut state = ProcessCpuState::default();
        assert_eq!(state.update(7, point(0, 0, 1, 10.0), 100), None);
        assert_eq!(state.update(7, point(50, 0, 1, 11.0), 100), Some(50.0));
        assert_eq!(state.update(8, point(0, 0, 1, 11.0), 100), None);
        assert_eq!(state.len(), 2);

        state.retain_pids(&HashSet::from([8]));
        assert_eq!(state.len(), 1);
        assert!(state.prev_sample.contains_key(&8));

        state.reset();
        assert!(state.is_empty());
    }

    #[test]
    fn test_system_state_reset() {
        let mut state = SystemCpuState {
            prev: Some(CpuTimeSample::default()),
        };
        state.reset();
        assert!(state.prev.is_none());
    }
}
