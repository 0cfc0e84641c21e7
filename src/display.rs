//! Human-readable rendering of a sample.

use procsnap::{CpuTime, DiskStat, LoadAverage, MemoryUsage, Sample};
use std::fmt::Write;

/// Format bytes to human readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// meminfo reports kilobytes
pub fn format_kb(kb: u64) -> String {
    format_bytes(kb.saturating_mul(1024))
}

fn render_cpu(out: &mut String, cpu: &CpuTime) {
    let _ = writeln!(
        out,
        "CPU ticks: user:{} nice:{} system:{} idle:{} iowait:{} irq:{} softirq:{} steal:{}",
        cpu.user, cpu.nice, cpu.system, cpu.idle, cpu.iowait, cpu.irq, cpu.softirq, cpu.steal
    );
    let total = cpu.total();
    let busy_pct = if total > 0 {
        100.0 * cpu.busy() as f64 / total as f64
    } else {
        0.0
    };
    let _ = writeln!(out, "  busy since boot: {:.1}% of {} ticks", busy_pct, total);
}

fn render_load(out: &mut String, load: &LoadAverage) {
    let _ = writeln!(
        out,
        "Load: {:.2} {:.2} {:.2}  last PID: {}",
        load.load1, load.load5, load.load15, load.last_pid
    );
}

fn render_memory(out: &mut String, mem: &MemoryUsage) {
    let _ = writeln!(
        out,
        "Memory: used {} free {} shared {} buffers {} cached {}",
        format_kb(mem.mem_used),
        format_kb(mem.mem_free),
        format_kb(mem.mem_shared),
        format_kb(mem.mem_buffers),
        format_kb(mem.mem_cached)
    );
    let _ = writeln!(
        out,
        "Swap: used {} free {} cached {}",
        format_kb(mem.swap_used),
        format_kb(mem.swap_free),
        format_kb(mem.swap_cached)
    );
}

fn render_disks(out: &mut String, disks: &[DiskStat]) {
    let _ = writeln!(
        out,
        "{:<12} {:>5} {:>10} {:>10} {:>11} {:>11} {:>6} {:>10}",
        "Device", "Maj:Mn", "Reads", "Writes", "Read", "Written", "InFlt", "IO ms"
    );
    for disk in disks {
        let _ = writeln!(
            out,
            "{:<12} {:>5} {:>10} {:>10} {:>11} {:>11} {:>6} {:>10}",
            disk.device,
            format!("{}:{}", disk.major, disk.minor),
            disk.reads_completed,
            disk.writes_completed,
            format_bytes(disk.bytes_read()),
            format_bytes(disk.bytes_written()),
            disk.in_flight,
            disk.io_time_ms
        );
    }
}

/// Renders every record present in the sample as a text block.
pub fn render_text(sample: &Sample) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "--- Snapshot {} ---",
        sample.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(ref cpu) = sample.cpu {
        render_cpu(&mut out, cpu);
    }
    if let Some(ref load) = sample.load {
        render_load(&mut out, load);
    }
    if let Some(ref mem) = sample.memory {
        render_memory(&mut out, mem);
    }
    if let Some(ref disks) = sample.disks {
        render_disks(&mut out, disks);
    }
    out
}
