//! Typed point-in-time snapshots of Linux `/proc` resource metrics.
//!
//! The crate reads four kernel text files and decodes them into plain
//! records:
//!
//! | Operation            | File             | Record          |
//! |----------------------|------------------|-----------------|
//! | [`get_cpu_time`]     | `/proc/stat`     | [`CpuTime`]     |
//! | [`get_load_average`] | `/proc/loadavg`  | [`LoadAverage`] |
//! | [`get_memory_usage`] | `/proc/meminfo`  | [`MemoryUsage`] |
//! | [`get_disk_stats`]   | `/proc/diskstats`| [`DiskStat`]... |
//!
//! Every call verifies that the source is a mounted proc filesystem, reads
//! one snapshot and parses it; there is no state between calls. CPU, load
//! and memory extraction are all-or-nothing. Disk statistics come back as a
//! lazy sequence that stops at the first malformed line.
//!
//! ```
//! use procsnap::{Collector, MockSource};
//!
//! let collector = Collector::new(MockSource::typical_system());
//! let load = collector.get_load_average().unwrap();
//! assert_eq!(load.last_pid, 12345);
//! ```

pub mod collector;
pub mod error;
pub mod metrics;
pub mod sample;
pub mod snapshot;
pub mod source;
pub mod tokenizer;

pub use collector::Collector;
pub use error::{ExtractError, ParseError, SnapshotError, SourceError};
pub use metrics::{CpuTime, DiskStat, DiskStats, LoadAverage, MemoryUsage};
pub use sample::{Metric, Sample};
pub use snapshot::{read_snapshot, Snapshot, SnapshotReader};
pub use source::{ensure_source_mounted, MetricsSource, MockSource, ProcFs};

/// Aggregate CPU ticks from `/proc/stat`.
pub fn get_cpu_time() -> Result<CpuTime, ExtractError> {
    Collector::default().get_cpu_time()
}

/// Load averages and last PID from `/proc/loadavg`.
pub fn get_load_average() -> Result<LoadAverage, ExtractError> {
    Collector::default().get_load_average()
}

/// Memory and swap usage from `/proc/meminfo`.
pub fn get_memory_usage() -> Result<MemoryUsage, ExtractError> {
    Collector::default().get_memory_usage()
}

/// Per-device counters from `/proc/diskstats`.
pub fn get_disk_stats() -> Result<DiskStats, ExtractError> {
    Collector::default().get_disk_stats()
}
