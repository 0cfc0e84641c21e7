//! A timestamped bundle of extracted records, handed to output adapters.

use crate::collector::Collector;
use crate::error::ExtractError;
use crate::metrics::{CpuTime, DiskStat, LoadAverage, MemoryUsage};
use crate::source::MetricsSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the four extractable metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpu,
    Load,
    Memory,
    Disk,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Cpu, Metric::Load, Metric::Memory, Metric::Disk];
}

/// Records extracted in one pass, with the time they were taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadAverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disks: Option<Vec<DiskStat>>,
}

impl Sample {
    /// Runs the selected extractors once each.
    ///
    /// The first failing extractor fails the whole sample. The disk sequence
    /// is drained into a `Vec`, so a malformed diskstats line shortens the
    /// list rather than failing.
    pub fn collect<S: MetricsSource>(
        collector: &Collector<S>,
        metrics: &[Metric],
    ) -> Result<Self, ExtractError> {
        let mut sample = Sample {
            timestamp: Utc::now(),
            cpu: None,
            load: None,
            memory: None,
            disks: None,
        };

        for metric in metrics {
            match metric {
                Metric::Cpu => sample.cpu = Some(collector.get_cpu_time()?),
                Metric::Load => sample.load = Some(collector.get_load_average()?),
                Metric::Memory => sample.memory = Some(collector.get_memory_usage()?),
                Metric::Disk => sample.disks = Some(collector.get_disk_stats()?.collect()),
            }
        }

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;

    #[test]
    fn test_collect_selected_metrics_only() {
        let collector = Collector::new(MockSource::typical_system());
        let sample = Sample::collect(&collector, &[Metric::Load, Metric::Disk]).unwrap();

        assert!(sample.cpu.is_none());
        assert!(sample.memory.is_none());
        assert_eq!(sample.load.unwrap().last_pid, 12345);
        assert_eq!(sample.disks.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_collect_fails_on_first_error() {
        let source = MockSource::typical_system().with_file("meminfo", "MemFree:\n");
        let collector = Collector::new(source);
        let err = Sample::collect(&collector, &Metric::ALL).unwrap_err();
        assert_eq!(err.missing_field(), Some("MemFree"));
    }

    #[test]
    fn test_serialized_sample_omits_unselected() {
        let collector = Collector::new(MockSource::typical_system());
        let sample = Sample::collect(&collector, &[Metric::Cpu]).unwrap();
        let json = serde_json::to_value(&sample).unwrap();

        assert_eq!(json["cpu"]["user"], 74608);
        assert!(json.get("disks").is_none());
        assert!(json.get("timestamp").is_some());

        let back: Sample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }
}
