//! Canned `/proc` trees for tests.
//!
//! Numbers are picked so derived metrics come out exact with `USER_HZ` 100:
//! system uptime is 10000 s, memory is half used, and the shell (pid 1000)
//! has averaged 6% CPU over its 9000 s of life.

use super::filesystem::MockFs;

const OS_RELEASE: &str = "\
NAME=\"Ubuntu\"
VERSION=\"22.04.3 LTS (Jammy Jellyfish)\"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME=\"Ubuntu 22.04.3 LTS\"
VERSION_ID=\"22.04\"
";

const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
messagebus:x:102:105::/nonexistent:/usr/sbin/nologin
nobody:x:65534:65534:nobody:/nonexistent:/usr/sbin/nologin
alice:x:1000:1000:Alice,,,:/home/alice:/bin/bash
";

const VERSION: &str = "Linux version 6.5.0-14-generic (buildd@lcy02-amd64-110) \
(x86_64-linux-gnu-gcc-12 (Ubuntu 12.3.0-1ubuntu1~22.04) 12.3.0, GNU ld 2.38) \
#14~22.04.1-Ubuntu SMP PREEMPT_DYNAMIC Mon Nov 20 18:15:30 UTC 2\n";

const MEMINFO: &str = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          3100000 kB
Shmem:            204800 kB
SwapTotal:       2097148 kB
SwapFree:        2097148 kB
";

/// Builds a `/proc/[pid]/stat` line. Fields after `starttime` are zero.
fn stat_line(
    pid: u32,
    comm: &str,
    state: char,
    ppid: u32,
    ticks: (u64, u64),
    starttime: u64,
) -> String {
    format!(
        "{pid} ({comm}) {state} {ppid} {pid} {pid} 0 -1 4194304 0 0 0 0 {} {} 0 0 20 0 1 0 {starttime} 0 0 0 0 0 0 0",
        ticks.0, ticks.1
    )
}

/// Builds a `/proc/[pid]/status` body for a process owned by `uid`.
fn status_body(
    name: &str,
    state: &str,
    pid: u32,
    ppid: u32,
    uid: u32,
    vm_size_kb: Option<u64>,
) -> String {
    let mut body = format!(
        "Name:\t{name}\nState:\t{state}\nTgid:\t{pid}\nPid:\t{pid}\nPPid:\t{ppid}\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\nGid:\t{uid}\t{uid}\t{uid}\t{uid}\n"
    );
    if let Some(kb) = vm_size_kb {
        body.push_str(&format!("VmSize:\t{:>8} kB\nVmRSS:\t{:>8} kB\n", kb, kb / 10));
    }
    body.push_str("Threads:\t1\n");
    body
}

impl MockFs {
    /// A small idle machine: init (1), a login shell (1000) and its child `cat` (1001).
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file("/etc/os-release", OS_RELEASE);
        fs.add_file("/etc/passwd", PASSWD);
        fs.add_file("/proc/version", VERSION);
        fs.add_file("/proc/uptime", "10000.00 38000.00\n");
        fs.add_file("/proc/meminfo", MEMINFO);
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 5000 250 1500 40000 500 100 50 0 0 0
cpu1 5000 250 1500 40000 500 100 50 0 0 0
ctxt 812345
btime 1700000000
processes 10000
procs_running 2
procs_blocked 1
softirq 0 0 0 0 0 0 0 0 0 0 0
",
        );

        // one tick after boot
        fs.add_process(
            1,
            &stat_line(1, "systemd", 'S', 0, (1000, 500), 1),
            &status_body("systemd", "S (sleeping)", 1, 0, 0, Some(170000)),
            "/sbin/init\0splash\0",
        );
        fs.add_process(
            1000,
            &stat_line(1000, "bash", 'S', 999, (45000, 9000), 100000),
            &status_body("bash", "S (sleeping)", 1000, 999, 1000, Some(25000)),
            "/bin/bash\0--login\0",
        );
        fs.add_process(
            1001,
            &stat_line(1001, "cat", 'R', 1000, (5, 2), 100100),
            &status_body("cat", "R (running)", 1001, 1000, 1000, Some(5000)),
            "/bin/cat\0notes.txt\0",
        );

        fs
    }

    /// [`MockFs::typical_system`] ten seconds later, under heavy load.
    ///
    /// 10000 aggregate ticks elapsed, 9000 of them busy; the shell burned 5 s.
    pub fn high_cpu_load() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file("/proc/uptime", "10010.00 38004.00\n");
        fs.add_file(
            "/proc/stat",
            "\
cpu  18000 500 4000 81000 1000 200 100 0 0 0
cpu0 9000 250 2000 40500 500 100 50 0 0 0
cpu1 9000 250 2000 40500 500 100 50 0 0 0
ctxt 2904417
btime 1700000000
processes 10050
procs_running 8
procs_blocked 2
",
        );
        fs.add_file(
            "/proc/1000/stat",
            stat_line(1000, "bash", 'R', 999, (45400, 9100), 100000),
        );

        fs
    }

    /// Adds processes whose names contain spaces and parentheses.
    pub fn with_special_names() -> Self {
        let mut fs = Self::typical_system();

        fs.add_process(
            5000,
            &stat_line(5000, "Web Content", 'S', 4999, (5000, 1000), 500000),
            &status_body("Web Content", "S (sleeping)", 5000, 4999, 1000, Some(2000000)),
            "/usr/lib/firefox/firefox\0-contentproc\0-isForBrowser\0",
        );
        fs.add_process(
            5001,
            &stat_line(5001, "test (1) x", 'S', 1, (10, 5), 500100),
            &status_body("test (1) x", "S (sleeping)", 5001, 1, 1000, Some(10000)),
            "./test (1) x\0",
        );

        fs
    }

    /// `/proc/6000` is still listed but the process is gone: none of its
    /// files can be read.
    pub fn with_exited_process() -> Self {
        let mut fs = Self::typical_system();
        fs.add_dir("/proc/6000");
        fs
    }

    /// Adds a zombie (4000) and a kernel thread (2); neither has a command
    /// line or a `VmSize:` line.
    pub fn with_zombie_process() -> Self {
        let mut fs = Self::typical_system();

        fs.add_process(
            4000,
            &stat_line(4000, "defunct", 'Z', 1000, (0, 0), 400000),
            &status_body("defunct", "Z (zombie)", 4000, 1000, 1000, None),
            "",
        );
        fs.add_process(
            2,
            &stat_line(2, "kthreadd", 'S', 0, (0, 3), 2),
            &status_body("kthreadd", "S (sleeping)", 2, 0, 0, None),
            "",
        );

        fs
    }
}
