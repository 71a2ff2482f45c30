//! sysmon - terminal system monitor.
//!
//! Polls `/proc` at a fixed interval and prints a system summary followed by
//! the busiest processes, as text or as one JSON document per line.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use sysmon_core::collector::{Collector, RealFs};
use sysmon_core::config::{DEFAULT_CLOCK_TICKS, ProcPaths};
use sysmon_core::fmt::{format_elapsed_time, format_percent, format_ratio, truncate};
use sysmon_core::models::Snapshot;

/// Terminal system monitor.
#[derive(Parser)]
#[command(name = "sysmon", about = "Terminal system and process monitor", version)]
struct Args {
    /// Seconds between snapshots.
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Stop after this many snapshots. Runs until interrupted when omitted.
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    count: Option<u64>,

    /// Path to /proc filesystem (for testing against a captured tree).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Path to the OS release file.
    #[arg(long, default_value = "/etc/os-release")]
    os_release_path: String,

    /// Path to the account database used to resolve user names.
    #[arg(long, default_value = "/etc/passwd")]
    passwd_path: String,

    /// Kernel clock ticks per second (USER_HZ).
    #[arg(long, default_value_t = DEFAULT_CLOCK_TICKS, value_parser = clap::value_parser!(u64).range(1..))]
    clock_ticks: u64,

    /// Number of processes to show, busiest first.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Print each snapshot as a single JSON line.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn proc_paths(&self) -> ProcPaths {
        ProcPaths::default()
            .with_proc_root(&self.proc_path)
            .with_os_release(&self.os_release_path)
            .with_passwd(&self.passwd_path)
            .with_clock_ticks(self.clock_ticks)
    }
}

/// Logs go to stderr so they never interleave with snapshot output.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["sysmon", "sysmon_core"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("invalid log directive for {}: {}", target, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Renders a snapshot as a text block: two summary lines, a header and up
/// to `top` process rows ordered by CPU.
fn render_text(snapshot: &Snapshot, top: usize) -> String {
    let system = &snapshot.system;
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}  kernel {}  up {}\n",
        format_timestamp(snapshot.timestamp),
        if system.operating_system.is_empty() {
            "unknown OS"
        } else {
            system.operating_system.as_str()
        },
        system.kernel,
        format_elapsed_time(system.uptime),
    ));
    out.push_str(&format!(
        "cpu {}  mem {}  procs {} total, {} running, {} blocked\n",
        format_ratio(system.cpu_utilization),
        format_ratio(system.memory_utilization),
        system.total_processes,
        system.running_processes,
        system.blocked_processes,
    ));
    out.push_str(&format!(
        "{:>7} {:<10} {:>7} {:>8} {:>10}  {}\n",
        "PID", "USER", "CPU%", "RAM(MB)", "TIME", "COMMAND"
    ));

    for process in snapshot.processes_by_cpu().into_iter().take(top) {
        out.push_str(&format!(
            "{:>7} {:<10} {:>7} {:>8} {:>10}  {}\n",
            process.pid,
            truncate(&process.user, 10),
            format_percent(process.cpu_percent),
            process.ram_mb,
            format_elapsed_time(process.uptime),
            truncate(&process.command, 60),
        ));
    }

    out
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("sysmon {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: interval={}s, proc={}, clock_ticks={}",
        args.interval, args.proc_path, args.clock_ticks
    );

    let mut collector = Collector::new(RealFs::new(), args.proc_paths());
    let interval = Duration::from_secs(args.interval);

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let mut snapshot_count: u64 = 0;
    let mut failed = false;

    while running.load(Ordering::SeqCst) {
        match collector.collect_snapshot() {
            Ok(snapshot) => {
                snapshot_count += 1;
                debug!(
                    "Snapshot #{}: {} processes in {:?}",
                    snapshot_count,
                    snapshot.processes.len(),
                    collector.last_duration().unwrap_or_default()
                );

                if args.json {
                    match serde_json::to_string(&snapshot) {
                        Ok(line) => println!("{}", line),
                        Err(e) => error!("Failed to serialize snapshot: {}", e),
                    }
                } else {
                    println!("{}", render_text(&snapshot, args.top));
                }
            }
            Err(e) => {
                error!("Failed to collect snapshot: {}", e);
                failed = true;
                break;
            }
        }

        if args.count.is_some_and(|count| snapshot_count >= count) {
            break;
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Stopped after {} snapshots", snapshot_count);
    if failed {
        std::process::exit(1);
    }
}
