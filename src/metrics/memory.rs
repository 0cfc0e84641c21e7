//! Memory and swap usage from /proc/meminfo.

use crate::error::ParseError;
use crate::tokenizer::Cursor;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pseudo-file holding the memory counters.
pub const MEMINFO_FILE: &str = "meminfo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemField {
    MemTotal,
    MemFree,
    MemShared,
    Buffers,
    Cached,
    SwapTotal,
    SwapFree,
    SwapCached,
}

/// Recognized meminfo labels. `MemShared` disappeared from 2.6 kernels and
/// `Shmem` took its place; both feed the same field.
const MEMINFO_LABELS: &[(&str, MemField)] = &[
    ("MemTotal", MemField::MemTotal),
    ("MemFree", MemField::MemFree),
    ("MemShared", MemField::MemShared),
    ("Shmem", MemField::MemShared),
    ("Buffers", MemField::Buffers),
    ("Cached", MemField::Cached),
    ("SwapTotal", MemField::SwapTotal),
    ("SwapFree", MemField::SwapFree),
    ("SwapCached", MemField::SwapCached),
];

/// Memory and swap usage in kilobytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub mem_free: u64,
    /// MemTotal - MemFree
    pub mem_used: u64,
    pub mem_shared: u64,
    pub mem_buffers: u64,
    pub mem_cached: u64,
    pub swap_free: u64,
    /// SwapTotal - SwapFree
    pub swap_used: u64,
    pub swap_cached: u64,
}

#[derive(Debug, Default)]
struct RawMemInfo {
    mem_total: u64,
    mem_free: u64,
    mem_shared: u64,
    buffers: u64,
    cached: u64,
    swap_total: u64,
    swap_free: u64,
    swap_cached: u64,
}

impl RawMemInfo {
    fn set(&mut self, field: MemField, value: u64) {
        let slot = match field {
            MemField::MemTotal => &mut self.mem_total,
            MemField::MemFree => &mut self.mem_free,
            MemField::MemShared => &mut self.mem_shared,
            MemField::Buffers => &mut self.buffers,
            MemField::Cached => &mut self.cached,
            MemField::SwapTotal => &mut self.swap_total,
            MemField::SwapFree => &mut self.swap_free,
            MemField::SwapCached => &mut self.swap_cached,
        };
        *slot = value;
    }
}

/// Looks up the table entry for a `Label:` line.
fn match_label(line: &str) -> Option<(&'static str, MemField)> {
    MEMINFO_LABELS.iter().copied().find(|(label, _)| {
        line.strip_prefix(label)
            .is_some_and(|rest| rest.starts_with(':'))
    })
}

/// Parses /proc/meminfo in a single forward pass.
///
/// Unrecognized labels are ignored and absent ones read as zero. The used
/// values are plain differences of the kernel counters.
pub fn parse_memory_usage(content: &str) -> Result<MemoryUsage, ParseError> {
    let mut raw = RawMemInfo::default();

    for line in content.lines() {
        let Some((label, field)) = match_label(line) else {
            continue;
        };

        let mut cursor = Cursor::new(line);
        cursor.skip_token();
        let value: u64 = cursor.next_value(label)?;
        raw.set(field, value);
    }

    let usage = MemoryUsage {
        mem_free: raw.mem_free,
        mem_used: raw.mem_total.wrapping_sub(raw.mem_free),
        mem_shared: raw.mem_shared,
        mem_buffers: raw.buffers,
        mem_cached: raw.cached,
        swap_free: raw.swap_free,
        swap_used: raw.swap_total.wrapping_sub(raw.swap_free),
        swap_cached: raw.swap_cached,
    };

    debug!(
        mem_total = raw.mem_total,
        swap_total = raw.swap_total,
        mem_free = usage.mem_free,
        mem_used = usage.mem_used,
        mem_shared = usage.mem_shared,
        buffers = usage.mem_buffers,
        cached = usage.mem_cached,
        swap_free = usage.swap_free,
        swap_used = usage.swap_used,
        swap_cached = usage.swap_cached,
        "memory usage"
    );

    Ok(usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_is_total_minus_free() {
        let usage = parse_memory_usage("MemTotal: 2048000 kB\nMemFree: 512000 kB\n").unwrap();
        assert_eq!(usage.mem_used, 1536000);
        assert_eq!(usage.mem_free, 512000);
        assert_eq!(usage.swap_used, 0);
    }

    #[test]
    fn test_parse_full_meminfo() {
        let content = "\
MemTotal:       16303428 kB
MemFree:         8049376 kB
MemAvailable:   12391456 kB
Buffers:          402592 kB
Cached:          3862212 kB
SwapCached:         1024 kB
Active:          4853024 kB
SwapTotal:       2097148 kB
SwapFree:        2000000 kB
Shmem:            612004 kB
ShmemHugePages:        0 kB
";
        let usage = parse_memory_usage(content).unwrap();
        assert_eq!(
            usage,
            MemoryUsage {
                mem_free: 8049376,
                mem_used: 16303428 - 8049376,
                mem_shared: 612004,
                mem_buffers: 402592,
                mem_cached: 3862212,
                swap_free: 2000000,
                swap_used: 97148,
                swap_cached: 1024,
            }
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        let forward = parse_memory_usage("MemTotal: 100 kB\nMemFree: 40 kB\n").unwrap();
        let reverse = parse_memory_usage("MemFree: 40 kB\nMemTotal: 100 kB\n").unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(reverse.mem_used, 60);
    }

    #[test]
    fn test_legacy_mem_shared() {
        let usage = parse_memory_usage("MemTotal: 100 kB\nMemShared: 7 kB\n").unwrap();
        assert_eq!(usage.mem_shared, 7);
    }

    #[test]
    fn test_cached_not_confused_with_swap_cached() {
        let usage = parse_memory_usage("SwapCached: 5 kB\n").unwrap();
        assert_eq!(usage.mem_cached, 0);
        assert_eq!(usage.swap_cached, 5);
    }

    #[test]
    fn test_empty_meminfo_is_all_zero() {
        assert_eq!(parse_memory_usage("").unwrap(), MemoryUsage::default());
    }

    #[test]
    fn test_recognized_label_without_value() {
        let err = parse_memory_usage("MemTotal: 100 kB\nBuffers:\n").unwrap_err();
        assert_eq!(err, ParseError::FieldMissing("Buffers"));
    }

    #[test]
    fn test_recognized_label_with_garbage_value() {
        let err = parse_memory_usage("Cached: lots kB\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { field: "Cached", .. }));
    }

    #[test]
    fn test_unrecognized_labels_ignored() {
        let usage = parse_memory_usage("HugePages_Total: x\nMemFree: 1 kB\n").unwrap();
        assert_eq!(usage.mem_free, 1);
    }
}
