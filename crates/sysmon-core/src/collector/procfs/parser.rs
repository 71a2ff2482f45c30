//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! (plus `/etc/os-release` and `/etc/passwd`) into structured data. They are
//! designed to be easily testable with string inputs.

use std::collections::HashMap;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

// ============ OS release / kernel version ============

/// Extracts `PRETTY_NAME` from `/etc/os-release` content.
///
/// Format: `KEY=value` or `KEY="value"`, one per line. Surrounding quotes are
/// stripped, inner spaces are kept.
pub fn parse_os_release(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim() != "PRETTY_NAME" {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        Some(value.to_string())
    })
}

/// Extracts the kernel release from `/proc/version` content.
///
/// Format: `Linux version <release> (...) ...`; the release is the third
/// whitespace-separated token of the first line.
pub fn parse_kernel_release(content: &str) -> Option<String> {
    content
        .lines()
        .next()?
        .split_whitespace()
        .nth(2)
        .map(str::to_string)
}

// ============ Memory ============

/// Parsed data from `/proc/meminfo`. All values in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
    pub available: u64,
    pub buffers: u64,
}

impl MemInfo {
    /// Fraction of memory in use: `(total - free) / total`.
    ///
    /// `None` when total is zero.
    pub fn utilization(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.total.saturating_sub(self.free) as f64 / self.total as f64)
    }
}

/// Parses `/proc/meminfo` content.
///
/// Lines are matched by key, not position. `MemTotal` is required; the other
/// keys default to zero when missing.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let mut info = MemInfo::default();
    let mut has_total = false;

    let parse_kb = |value: &str| -> u64 {
        value
            .split_whitespace()
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "MemTotal" => {
                info.total = parse_kb(value);
                has_total = true;
            }
            "MemFree" => info.free = parse_kb(value),
            "MemAvailable" => info.available = parse_kb(value),
            "Buffers" => info.buffers = parse_kb(value),
            _ => {}
        }
    }

    if !has_total {
        return Err(ParseError::new("missing MemTotal in meminfo"));
    }
    Ok(info)
}

// ============ Uptime ============

/// Parsed data from `/proc/uptime`, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Uptime {
    pub uptime: f64,
    pub idle: f64,
}

/// Parses `/proc/uptime` content: `<uptime-seconds> <idle-seconds>`.
pub fn parse_uptime(content: &str) -> Result<Uptime, ParseError> {
    let mut parts = content.split_whitespace();
    let uptime = parts
        .next()
        .ok_or_else(|| ParseError::new("empty uptime"))?
        .parse::<f64>()
        .map_err(|_| ParseError::new("invalid uptime"))?;
    let idle = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0.0);

    if !uptime.is_finite() || uptime < 0.0 {
        return Err(ParseError::new("invalid uptime"));
    }
    Ok(Uptime { uptime, idle })
}

// ============ System CPU / stat ============

/// Aggregate CPU counters from the `cpu` line of `/proc/stat`, in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimeSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuTimeSample {
    /// idle + iowait.
    pub fn idle_all(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// system + irq + softirq.
    pub fn system_all(&self) -> u64 {
        self.system
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
    }

    /// guest + guest_nice.
    pub fn virtual_all(&self) -> u64 {
        self.guest.saturating_add(self.guest_nice)
    }

    /// All ticks accounted since boot, saturating at `u64::MAX`.
    ///
    /// The kernel already counts guest time inside user and nice, so those two
    /// are taken net of the guest buckets before `virtual_all` is added back.
    pub fn total(&self) -> u64 {
        let user = self.user.saturating_sub(self.guest);
        let nice = self.nice.saturating_sub(self.guest_nice);
        [self.system_all(), self.idle_all(), self.steal, self.virtual_all()]
            .into_iter()
            .fold(user.saturating_add(nice), u64::saturating_add)
    }

    /// Busy fraction since boot: `(total - idle_all) / total`.
    ///
    /// `None` when no ticks were recorded.
    pub fn utilization(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(total.saturating_sub(self.idle_all()) as f64 / total as f64)
    }

    /// Busy fraction over the interval since `prev`.
    ///
    /// `None` when no ticks elapsed or the counters went backwards (a
    /// different boot, or samples passed in the wrong order).
    pub fn utilization_since(&self, prev: &CpuTimeSample) -> Option<f64> {
        let total = self.total().checked_sub(prev.total())?;
        let idle = self.idle_all().checked_sub(prev.idle_all())?;
        if total == 0 || idle > total {
            return None;
        }
        Some((total - idle) as f64 / total as f64)
    }
}

/// Global stats from `/proc/stat`.
///
/// Keys that are absent from the file stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalStat {
    pub cpu: Option<CpuTimeSample>,
    pub btime: Option<u64>,
    pub processes: Option<u64>,
    pub procs_running: Option<u64>,
    pub procs_blocked: Option<u64>,
}

/// Parses `/proc/stat` content.
///
/// Only the aggregate `cpu` line is kept; per-core `cpuN` lines are skipped.
/// Missing trailing counters (older kernels lack steal/guest) read as zero.
pub fn parse_global_stat(content: &str) -> Result<GlobalStat, ParseError> {
    let mut stat = GlobalStat::default();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&key) = parts.first() else {
            continue;
        };

        let get_val = |idx: usize| -> Result<u64, ParseError> {
            match parts.get(idx) {
                Some(s) => s
                    .parse()
                    .map_err(|_| ParseError::new(format!("invalid value for {}", key))),
                None => Ok(0),
            }
        };

        match key {
            "cpu" => {
                if parts.len() < 5 {
                    return Err(ParseError::new("not enough fields in cpu line"));
                }
                stat.cpu = Some(CpuTimeSample {
                    user: get_val(1)?,
                    nice: get_val(2)?,
                    system: get_val(3)?,
                    idle: get_val(4)?,
                    iowait: get_val(5)?,
                    irq: get_val(6)?,
                    softirq: get_val(7)?,
                    steal: get_val(8)?,
                    guest: get_val(9)?,
                    guest_nice: get_val(10)?,
                });
            }
            "btime" => stat.btime = parts.get(1).and_then(|s| s.parse().ok()),
            "processes" => stat.processes = parts.get(1).and_then(|s| s.parse().ok()),
            "procs_running" => stat.procs_running = parts.get(1).and_then(|s| s.parse().ok()),
            "procs_blocked" => stat.procs_blocked = parts.get(1).and_then(|s| s.parse().ok()),
            _ => {}
        }
    }

    Ok(stat)
}

// ============ Per-process stat ============

/// Parsed data from `/proc/[pid]/stat`.
///
/// Only the fields the readers use are kept. Field numbers in comments are
/// the 1-based positions documented in proc(5).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStat {
    /// (1)
    pub pid: u32,
    /// (2) without the surrounding parentheses.
    pub comm: String,
    /// (3)
    pub state: char,
    /// (4)
    pub ppid: u32,
    /// (14) user-mode ticks.
    pub utime: u64,
    /// (15) kernel-mode ticks.
    pub stime: u64,
    /// (16) waited-for children, user mode.
    pub cutime: i64,
    /// (17) waited-for children, kernel mode.
    pub cstime: i64,
    /// (22) ticks after boot at which the process started.
    pub starttime: u64,
    /// (23) bytes.
    pub vsize: u64,
}

/// Per-process CPU counters, in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCpuSample {
    pub utime: u64,
    pub stime: u64,
    pub cutime: i64,
    pub cstime: i64,
    pub starttime: u64,
}

impl ProcessCpuSample {
    /// Ticks spent by the process itself (utime + stime).
    pub fn busy_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

impl From<&ProcStat> for ProcessCpuSample {
    fn from(stat: &ProcStat) -> Self {
        Self {
            utime: stat.utime,
            stime: stat.stime,
            cutime: stat.cutime,
            cstime: stat.cstime,
            starttime: stat.starttime,
        }
    }
}

/// Parses `/proc/[pid]/stat` content.
///
/// The format is tricky because the comm field can contain spaces and
/// parentheses, so positional fields are counted from the last `)`.
/// Format: pid (comm) state ppid pgrp session tty_nr ...
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, ParseError> {
    let content = content.trim();

    let open_paren = content
        .find('(')
        .ok_or_else(|| ParseError::new("missing '(' in stat"))?;
    let close_paren = content
        .rfind(')')
        .ok_or_else(|| ParseError::new("missing ')' in stat"))?;

    if close_paren <= open_paren {
        return Err(ParseError::new("invalid parentheses in stat"));
    }

    let pid: u32 = content[..open_paren]
        .trim()
        .parse()
        .map_err(|_| ParseError::new("invalid pid"))?;

    let comm = content[open_paren + 1..close_paren].to_string();

    // fields[0] is field (3), so field (n) lives at fields[n - 3]
    let fields: Vec<&str> = content[close_paren + 1..].split_whitespace().collect();

    if fields.len() < 20 {
        return Err(ParseError::new(format!(
            "not enough fields in stat: expected 22+, got {}",
            fields.len() + 2
        )));
    }

    let parse_i64 = |field: usize, name: &str| -> Result<i64, ParseError> {
        fields[field - 3]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };

    let parse_u64 = |field: usize, name: &str| -> Result<u64, ParseError> {
        fields[field - 3]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };

    Ok(ProcStat {
        pid,
        comm,
        state: fields[0].chars().next().unwrap_or('?'),
        ppid: parse_u64(4, "ppid")? as u32,
        utime: parse_u64(14, "utime")?,
        stime: parse_u64(15, "stime")?,
        cutime: parse_i64(16, "cutime")?,
        cstime: parse_i64(17, "cstime")?,
        starttime: parse_u64(22, "starttime")?,
        vsize: fields.get(20).and_then(|s| s.parse().ok()).unwrap_or(0),
    })
}

// ============ Per-process status ============

/// Parsed data from `/proc/[pid]/status`.
///
/// Keys that are absent from the file stay `None`. Kernel threads and
/// zombies have no `Vm*` lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStatus {
    pub name: Option<String>,
    /// Real UID, first value of the `Uid:` line, as written.
    pub uid: Option<String>,
    /// `VmSize:` in kB.
    pub vm_size: Option<i64>,
    /// `VmRSS:` in kB.
    pub vm_rss: Option<i64>,
}

/// Parses `/proc/[pid]/status` content.
///
/// Format is key:\tvalue pairs, one per line.
pub fn parse_proc_status(content: &str) -> ProcStatus {
    let mut fields: HashMap<&str, &str> = HashMap::new();

    for line in content.lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim(), value.trim());
        }
    }

    let first_token = |key: &str| -> Option<&str> {
        fields.get(key).and_then(|s| s.split_whitespace().next())
    };

    // Memory fields are in kB format: "12345 kB"
    let parse_kb = |key: &str| -> Option<i64> { first_token(key).and_then(|s| s.parse().ok()) };

    ProcStatus {
        name: fields.get("Name").map(|s| s.to_string()),
        uid: first_token("Uid").map(str::to_string),
        vm_size: parse_kb("VmSize"),
        vm_rss: parse_kb("VmRSS"),
    }
}

// ============ Per-process cmdline ============

/// Returns the first line of `/proc/[pid]/cmdline` verbatim.
///
/// Arguments stay NUL-joined; nothing is split or trimmed.
pub fn parse_cmdline(content: &str) -> &str {
    content.split('\n').next().unwrap_or("")
}

// ============ Account database ============

/// Looks up the account name for `uid` in `/etc/passwd` content.
///
/// Format: username:password:uid:gid:gecos:home:shell. The uid column is
/// compared exactly. If several entries share the uid, the last one wins.
pub fn lookup_user(content: &str, uid: &str) -> Option<String> {
    let mut found = None;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split(':');
        let (Some(name), Some(_), Some(entry_uid)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        if entry_uid == uid {
            found = Some(name.to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_os_release() {
        let content = "\
NAME=\"Fedora Linux\"
VERSION=\"39 (Workstation Edition)\"
PRETTY_NAME=\"Fedora Linux 39 (Workstation Edition)\"
";
        assert_eq!(
            parse_os_release(content),
            Some("Fedora Linux 39 (Workstation Edition)".to_string())
        );
    }

    #[test]
    fn test_parse_os_release_unquoted_and_missing() {
        assert_eq!(
            parse_os_release("ID=alpine\nPRETTY_NAME=Alpine\n"),
            Some("Alpine".to_string())
        );
        assert_eq!(parse_os_release("NAME=\"Arch Linux\"\n"), None);
        assert_eq!(parse_os_release(""), None);
    }

    #[test]
    fn test_parse_kernel_release() {
        let content = "Linux version 6.1.0-13-amd64 (debian-kernel@lists.debian.org) (gcc-12) #1 SMP PREEMPT_DYNAMIC\n";
        assert_eq!(
            parse_kernel_release(content),
            Some("6.1.0-13-amd64".to_string())
        );
        assert_eq!(parse_kernel_release("Linux version\n"), None);
        assert_eq!(parse_kernel_release(""), None);
    }

    #[test]
    fn test_parse_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         1024000 kB
MemAvailable:    8192000 kB
Buffers:          512000 kB
Cached:          4096000 kB
";
        let info = parse_meminfo(content).unwrap();
        assert_eq!(info.total, 16384000);
        assert_eq!(info.free, 1024000);
        assert_eq!(info.available, 8192000);
        assert_eq!(info.buffers, 512000);
        assert_eq!(info.utilization(), Some(15360000.0 / 16384000.0));
    }

    #[test]
    fn test_parse_meminfo_matches_by_name() {
        // Order differs from the usual kernel layout
        let content = "\
Buffers:             100 kB
MemFree:             250 kB
MemTotal:           1000 kB
";
        let info = parse_meminfo(content).unwrap();
        assert_eq!(info.total, 1000);
        assert_eq!(info.free, 250);
        assert_eq!(info.buffers, 100);
        assert_eq!(info.available, 0);
        assert_eq!(info.utilization(), Some(0.75));
    }

    #[test]
    fn test_parse_meminfo_zero_total() {
        let info = parse_meminfo("MemTotal: 0 kB\nMemFree: 0 kB\n").unwrap();
        assert_eq!(info.utilization(), None);
        assert!(parse_meminfo("MemFree: 10 kB\n").is_err());
    }

    #[test]
    fn test_parse_uptime() {
        let uptime = parse_uptime("350735.47 234388.90\n").unwrap();
        assert_eq!(uptime.uptime, 350735.47);
        assert_eq!(uptime.idle, 234388.90);

        assert!(parse_uptime("").is_err());
        assert!(parse_uptime("abc 1.0").is_err());
    }

    #[test]
    fn test_parse_global_stat() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 50 0 0
cpu0 5000 250 1500 40000 500 100 50 25 0 0
intr 1000000 50 0 0
ctxt 500000
btime 1700000000
processes 12345
procs_running 3
procs_blocked 1
";
        let stat = parse_global_stat(content).unwrap();
        let cpu = stat.cpu.unwrap();
        assert_eq!(cpu.user, 10000);
        assert_eq!(cpu.idle, 80000);
        assert_eq!(cpu.steal, 50);
        assert_eq!(stat.btime, Some(1700000000));
        assert_eq!(stat.processes, Some(12345));
        assert_eq!(stat.procs_running, Some(3));
        assert_eq!(stat.procs_blocked, Some(1));
    }

    #[test]
    fn test_parse_global_stat_missing_keys() {
        let stat = parse_global_stat("cpu  1 2 3 4\nctxt 5\n").unwrap();
        let cpu = stat.cpu.unwrap();
        assert_eq!(cpu.idle, 4);
        assert_eq!(cpu.iowait, 0);
        assert_eq!(cpu.guest_nice, 0);
        assert_eq!(stat.processes, None);
        assert_eq!(stat.procs_running, None);

        assert!(parse_global_stat("cpu  1 2\n").is_err());
        assert!(parse_global_stat("cpu  1 2 x 4\n").is_err());
    }

    #[test]
    fn test_cpu_buckets() {
        let cpu = CpuTimeSample {
            user: 10000,
            nice: 500,
            system: 3000,
            idle: 80000,
            iowait: 1000,
            irq: 200,
            softirq: 100,
            steal: 0,
            guest: 0,
            guest_nice: 0,
        };
        assert_eq!(cpu.idle_all(), 81000);
        assert_eq!(cpu.system_all(), 3300);
        assert_eq!(cpu.virtual_all(), 0);
        assert_eq!(cpu.total(), 94800);
        assert_eq!(cpu.utilization(), Some(13800.0 / 94800.0));
    }

    #[test]
    fn test_cpu_guest_time_not_double_counted() {
        let cpu = CpuTimeSample {
            user: 1000,
            nice: 100,
            idle: 900,
            guest: 400,
            guest_nice: 50,
            ..Default::default()
        };
        // user and nice already include the guest buckets
        assert_eq!(cpu.total(), 2000);
        assert_eq!(cpu.utilization(), Some(0.55));
    }

    #[test]
    fn test_cpu_utilization_since() {
        let prev = CpuTimeSample {
            user: 100,
            idle: 900,
            ..Default::default()
        };
        let curr = CpuTimeSample {
            user: 175,
            idle: 925,
            ..Default::default()
        };
        assert_eq!(curr.utilization_since(&prev), Some(0.75));
        assert_eq!(curr.utilization_since(&curr), None);
        assert_eq!(prev.utilization_since(&curr), None);
        assert_eq!(CpuTimeSample::default().utilization(), None);
    }

    #[test]
    fn test_huge_counters_saturate() {
        let cpu = CpuTimeSample {
            user: u64::MAX / 2,
            idle: u64::MAX / 2,
            iowait: 10,
            ..Default::default()
        };
        assert_eq!(cpu.total(), u64::MAX);
        assert_eq!(cpu.idle_all(), u64::MAX / 2 + 10);
        let util = cpu.utilization().unwrap();
        assert!((0.0..=1.0).contains(&util));

        let maxed = CpuTimeSample {
            system: u64::MAX,
            irq: 1,
            guest: u64::MAX,
            guest_nice: 1,
            ..Default::default()
        };
        assert_eq!(maxed.system_all(), u64::MAX);
        assert_eq!(maxed.virtual_all(), u64::MAX);
        assert_eq!(maxed.utilization(), Some(1.0));

        let process = ProcessCpuSample {
            utime: u64::MAX,
            stime: 5,
            ..Default::default()
        };
        assert_eq!(process.busy_ticks(), u64::MAX);
    }

    #[test]
    fn test_parse_proc_stat_basic() {
        let content = "1234 (bash) S 1233 1234 1234 34816 1235 4194304 5000 50000 10 20 100 50 200 100 20 0 1 0 100000 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 5 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 1234);
        assert_eq!(stat.comm, "bash");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.ppid, 1233);
        assert_eq!(stat.utime, 100);
        assert_eq!(stat.stime, 50);
        assert_eq!(stat.cutime, 200);
        assert_eq!(stat.cstime, 100);
        assert_eq!(stat.starttime, 100000);
        assert_eq!(stat.vsize, 25000000);

        let sample = ProcessCpuSample::from(&stat);
        assert_eq!(sample.busy_ticks(), 150);
        assert_eq!(sample.starttime, 100000);
    }

    #[test]
    fn test_parse_proc_stat_with_spaces_in_comm() {
        let content = "5000 (Web Content) S 4999 5000 4999 0 -1 4194304 100000 0 500 0 5000 1000 0 0 20 0 20 0 500000 2000000000 50000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 5000);
        assert_eq!(stat.comm, "Web Content");
        assert_eq!(stat.utime, 5000);
        assert_eq!(stat.starttime, 500000);
    }

    #[test]
    fn test_parse_proc_stat_with_parentheses_in_comm() {
        let content = "5001 (a) b (c)) S 1 5001 5001 0 -1 4194304 1000 0 0 0 10 5 0 0 20 0 1 0 500100 10000000 1000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.comm, "a) b (c)");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.utime, 10);
        assert_eq!(stat.stime, 5);
        assert_eq!(stat.starttime, 500100);
    }

    #[test]
    fn test_parse_proc_stat_negative_child_times() {
        let content = "77 (sh) S 1 77 77 0 -1 0 0 0 0 0 3 4 -1 -2 20 0 1 0 900 0 0";
        let stat = parse_proc_stat(content).unwrap();
        assert_eq!(stat.cutime, -1);
        assert_eq!(stat.cstime, -2);
        assert_eq!(stat.vsize, 0);
    }

    #[test]
    fn test_parse_proc_stat_truncated() {
        assert!(parse_proc_stat("").is_err());
        assert!(parse_proc_stat("12 (sh) S 1 2 3").is_err());
        assert!(parse_proc_stat("12 sh S 1 2 3").is_err());
        assert!(parse_proc_stat("x (sh) S 1 77 77 0 -1 0 0 0 0 0 3 4 1 2 20 0 1 0 900 0").is_err());
    }

    #[test]
    fn test_parse_proc_status() {
        let content = "\
Name:\tnginx
Umask:\t0022
State:\tS (sleeping)
Pid:\t5678
PPid:\t1
Uid:\t33\t33\t33\t33
Gid:\t33\t33\t33\t33
VmPeak:\t  150000 kB
VmSize:\t  145000 kB
VmRSS:\t   25000 kB
";
        let status = parse_proc_status(content);

        assert_eq!(status.name.as_deref(), Some("nginx"));
        assert_eq!(status.uid.as_deref(), Some("33"));
        assert_eq!(status.vm_size, Some(145000));
        assert_eq!(status.vm_rss, Some(25000));
    }

    #[test]
    fn test_parse_proc_status_kernel_thread() {
        let status = parse_proc_status("Name:\tkworker/0:1\nUid:\t0\t0\t0\t0\n");
        assert_eq!(status.name.as_deref(), Some("kworker/0:1"));
        assert_eq!(status.uid.as_deref(), Some("0"));
        assert_eq!(status.vm_size, None);
        assert_eq!(status.vm_rss, None);
    }

    #[test]
    fn test_parse_cmdline_keeps_nuls() {
        assert_eq!(parse_cmdline("/bin/bash\0--login\0"), "/bin/bash\0--login\0");
        assert_eq!(parse_cmdline("sh\0-c\0echo a\nb\0"), "sh\0-c\0echo a");
        assert_eq!(parse_cmdline(""), "");
    }

    #[test]
    fn test_lookup_user() {
        let content = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
nobody:x:65534:65534:nobody:/nonexistent:/usr/sbin/nologin
user:x:1000:1000:User Name:/home/user:/bin/bash
";
        assert_eq!(lookup_user(content, "0"), Some("root".to_string()));
        assert_eq!(lookup_user(content, "1"), Some("daemon".to_string()));
        assert_eq!(lookup_user(content, "1000"), Some("user".to_string()));
        assert_eq!(lookup_user(content, "65534"), Some("nobody".to_string()));
        assert_eq!(lookup_user(content, "100"), None);
        assert_eq!(lookup_user(content, ""), None);
    }

    #[test]
    fn test_lookup_user_last_match_wins() {
        let content = "\
# local overrides follow
root:x:0:0:root:/root:/bin/bash
toor:x:0:0:root alias:/root:/bin/sh
broken-line
";
        assert_eq!(lookup_user(content, "0"), Some("toor".to_string()));
    }
}
