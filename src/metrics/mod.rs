//! Per-metric extractors over /proc snapshot text.

pub mod cpu;
pub mod disk;
pub mod load;
pub mod memory;

pub use cpu::{parse_cpu_time, CpuTime};
pub use disk::{parse_disk_stat_line, DiskStat, DiskStats};
pub use load::{parse_load_average, LoadAverage};
pub use memory::{parse_memory_usage, MemoryUsage};
