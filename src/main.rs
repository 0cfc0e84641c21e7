//! procsnap - print a typed snapshot of /proc CPU, load, memory and disk metrics.
//!
//! Each invocation takes exactly one sample and writes it as a JSON line or
//! as a text block.

mod display;
mod logging;

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use logging::{OutputFormat, SampleWriter};
use procsnap::source::PROCFS_ROOT;
use procsnap::{Collector, Metric, ProcFs, Sample, SnapshotReader};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Upper bound for `--capacity` (16 MiB).
const MAX_CAPACITY: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetricArg {
    Cpu,
    Load,
    Memory,
    Disk,
    All,
}

/// Typed point-in-time snapshot of Linux /proc resource metrics
#[derive(Parser, Debug)]
#[command(name = "procsnap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Metrics to extract
    #[arg(value_enum, default_value = "all")]
    metrics: Vec<MetricArg>,

    /// Mount point of the proc filesystem
    #[arg(short = 'r', long, default_value = PROCFS_ROOT)]
    proc_root: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Append the sample to this file instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bytes read from each pseudo-file
    #[arg(
        long,
        default_value_t = procsnap::snapshot::DEFAULT_CAPACITY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_CAPACITY)
    )]
    capacity: usize,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn selected_metrics(&self) -> Vec<Metric> {
        let mut selected = Vec::new();
        for arg in &self.metrics {
            let metrics: &[Metric] = match arg {
                MetricArg::Cpu => &[Metric::Cpu],
                MetricArg::Load => &[Metric::Load],
                MetricArg::Memory => &[Metric::Memory],
                MetricArg::Disk => &[Metric::Disk],
                MetricArg::All => &Metric::ALL,
            };
            for metric in metrics {
                if !selected.contains(metric) {
                    selected.push(*metric);
                }
            }
        }
        selected
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let metrics = args.selected_metrics();
    debug!(?metrics, root = %args.proc_root.display(), "collecting sample");

    let collector = Collector::new(ProcFs::new(&args.proc_root))
        .with_reader(SnapshotReader::with_capacity(args.capacity));
    let sample = Sample::collect(&collector, &metrics)
        .with_context(|| format!("Failed to read metrics from {}", args.proc_root.display()))?;

    let mut writer = match args.output {
        Some(ref path) => SampleWriter::append_to(path, args.format)?,
        None => SampleWriter::stdout(args.format),
    };
    writer.write(&sample)?;
    debug!(
        samples = writer.samples_written(),
        format = ?args.format,
        "sample written"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_all() {
        let args = Args::parse_from(["procsnap"]);
        assert_eq!(args.selected_metrics(), Metric::ALL.to_vec());
        assert_eq!(args.proc_root, PathBuf::from("/proc"));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.capacity, 4096);
    }

    #[test]
    fn test_selection_is_deduplicated_in_order() {
        let args = Args::parse_from(["procsnap", "disk", "cpu", "disk", "-f", "json", "-vv"]);
        assert_eq!(args.selected_metrics(), vec![Metric::Disk, Metric::Cpu]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_custom_root_and_capacity() {
        let args = Args::parse_from(["procsnap", "load", "--proc-root", "/host/proc", "--capacity", "65536"]);
        assert_eq!(args.proc_root, PathBuf::from("/host/proc"));
        assert_eq!(args.capacity, 65536);
    }

    #[test]
    fn test_capacity_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["procsnap", "--capacity", "0"]).is_err());
        assert!(Args::try_parse_from(["procsnap", "--capacity", "18446744073709551615"]).is_err());
        let args = Args::try_parse_from(["procsnap", "--capacity", "16777216"]).unwrap();
        assert_eq!(args.capacity, 16 * 1024 * 1024);
    }
}
