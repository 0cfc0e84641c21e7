//! The four extraction operations over a metrics source.
//!
//! Each call checks that the source is mounted, reads its own snapshot and
//! parses it. Nothing is cached between calls, so concurrent calls on a
//! shared `Collector` are independent.

use crate::error::{ExtractError, SourceError};
use crate::metrics::cpu::{parse_cpu_time, CpuTime, STAT_FILE};
use crate::metrics::disk::{DiskStats, DISKSTATS_FILE};
use crate::metrics::load::{parse_load_average, LoadAverage, LOADAVG_FILE};
use crate::metrics::memory::{parse_memory_usage, MemoryUsage, MEMINFO_FILE};
use crate::snapshot::{Snapshot, SnapshotReader};
use crate::source::{ensure_source_mounted, MetricsSource, ProcFs};

/// Extracts typed metrics from a [`MetricsSource`].
#[derive(Debug, Clone)]
pub struct Collector<S> {
    source: S,
    reader: SnapshotReader,
}

impl<S: MetricsSource> Collector<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            reader: SnapshotReader::new(),
        }
    }

    /// Replaces the snapshot reader, e.g. to raise the read capacity.
    pub fn with_reader(mut self, reader: SnapshotReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn ensure_source_mounted(&self) -> Result<(), SourceError> {
        ensure_source_mounted(&self.source)
    }

    fn snapshot(&self, name: &str) -> Result<Snapshot, ExtractError> {
        self.ensure_source_mounted()?;
        Ok(self.reader.read(&self.source, name)?)
    }

    /// Aggregate CPU ticks from the first line of `stat`.
    pub fn get_cpu_time(&self) -> Result<CpuTime, ExtractError> {
        let snapshot = self.snapshot(STAT_FILE)?;
        Ok(parse_cpu_time(snapshot.text())?)
    }

    pub fn get_load_average(&self) -> Result<LoadAverage, ExtractError> {
        let snapshot = self.snapshot(LOADAVG_FILE)?;
        Ok(parse_load_average(snapshot.text())?)
    }

    pub fn get_memory_usage(&self) -> Result<MemoryUsage, ExtractError> {
        let snapshot = self.snapshot(MEMINFO_FILE)?;
        Ok(parse_memory_usage(snapshot.text())?)
    }

    /// Lazy per-device sequence over one `diskstats` snapshot.
    ///
    /// Only the availability check and the read can fail the call; a
    /// malformed line ends the returned sequence early instead.
    pub fn get_disk_stats(&self) -> Result<DiskStats, ExtractError> {
        let snapshot = self.snapshot(DISKSTATS_FILE)?;
        Ok(DiskStats::new(snapshot))
    }
}

impl Default for Collector<ProcFs> {
    fn default() -> Self {
        Self::new(ProcFs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, SnapshotError};
    use crate::source::MockSource;

    #[test]
    fn test_typical_system() {
        let collector = Collector::new(MockSource::typical_system());

        let cpu = collector.get_cpu_time().unwrap();
        assert_eq!(cpu.user, 74608);
        assert_eq!(cpu.steal, 0);

        let load = collector.get_load_average().unwrap();
        assert_eq!(load.load15, 0.59);
        assert_eq!(load.last_pid, 12345);

        let mem = collector.get_memory_usage().unwrap();
        assert_eq!(mem.mem_used, 16303428 - 8049376);
        assert_eq!(mem.mem_shared, 612004);
        assert_eq!(mem.swap_used, 0);

        let disks: Vec<_> = collector.get_disk_stats().unwrap().collect();
        assert_eq!(disks.len(), 3);
        assert_eq!(disks[2].device, "nvme0n1");
        assert_eq!(disks[2].major, 259);
        assert_eq!(disks[2].in_flight, 2);
    }

    #[test]
    fn test_unmounted_source_reads_nothing() {
        let source = MockSource::unmounted().with_file("stat", "cpu 1 2 3 4 5 6 7 8\n");
        let collector = Collector::new(source);

        assert!(collector.get_cpu_time().unwrap_err().is_source_unavailable());
        assert!(collector.get_load_average().unwrap_err().is_source_unavailable());
        assert!(collector.get_memory_usage().unwrap_err().is_source_unavailable());
        assert!(collector.get_disk_stats().unwrap_err().is_source_unavailable());
        assert_eq!(collector.source().open_count(), 0);
    }

    #[test]
    fn test_missing_file() {
        let collector = Collector::new(MockSource::new());
        let err = collector.get_load_average().unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Snapshot(SnapshotError::NotFound { .. })
        ));
    }

    #[test]
    fn test_parse_failure_surfaces() {
        let collector = Collector::new(MockSource::new().with_file("stat", "cpu 1 2 3\n"));
        let err = collector.get_cpu_time().unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Parse(ParseError::FieldMissing("idle"))
        ));
    }

    #[test]
    fn test_small_reader_capacity_truncates_disks() {
        let collector = Collector::new(MockSource::typical_system())
            .with_reader(SnapshotReader::with_capacity(120));
        let mut disks = collector.get_disk_stats().unwrap();
        assert_eq!(disks.by_ref().count(), 1);
        assert!(disks.stopped_early());
    }
}
