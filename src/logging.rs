//! Writing samples to stdout or a log file.

use crate::display::render_text;
use anyhow::{Context, Result};
use clap::ValueEnum;
use procsnap::Sample;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output encoding for samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Json,
    /// Human-readable text block
    Text,
}

/// Writes samples in the chosen format
pub struct SampleWriter {
    writer: BufWriter<Box<dyn Write>>,
    format: OutputFormat,
    samples_written: u64,
}

impl SampleWriter {
    pub fn new(writer: Box<dyn Write>, format: OutputFormat) -> Self {
        Self {
            writer: BufWriter::new(writer),
            format,
            samples_written: 0,
        }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(std::io::stdout()), format)
    }

    /// Append samples to a file, creating it if needed
    pub fn append_to<P: AsRef<Path>>(path: P, format: OutputFormat) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .with_context(|| format!("Failed to open output file: {}", path.as_ref().display()))?;
        Ok(Self::new(Box::new(file), format))
    }

    /// Write one sample and flush
    pub fn write(&mut self, sample: &Sample) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string(sample)?;
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::Text => {
                write!(self.writer, "{}", render_text(sample))?;
            }
        }
        self.samples_written += 1;
        self.writer.flush()?;
        Ok(())
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }
}

impl Drop for SampleWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
