//! Per-device disk I/O counters from /proc/diskstats.

use crate::error::ParseError;
use crate::snapshot::Snapshot;
use crate::tokenizer::Cursor;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use tracing::{debug, warn};

/// Pseudo-file holding the disk counters.
pub const DISKSTATS_FILE: &str = "diskstats";

/// Size of a sector as reported in /proc/diskstats, regardless of device.
pub const SECTOR_SIZE: u64 = 512;

/// Longest accepted device name, in bytes.
pub const DEVICE_NAME_MAX_LEN: usize = 32;

/// Cumulative I/O counters of one block device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskStat {
    /// Block device major number
    pub major: u32,
    /// Block device minor number
    pub minor: u32,
    /// Device name (e.g., "sda", "nvme0n1")
    pub device: String,
    pub reads_completed: u64,
    pub reads_merged: u64,
    pub sectors_read: u64,
    /// Time spent reading (ms)
    pub read_time_ms: u64,
    pub writes_completed: u64,
    pub writes_merged: u64,
    pub sectors_written: u64,
    /// Time spent writing (ms)
    pub write_time_ms: u64,
    /// I/Os currently in progress
    pub in_flight: u64,
    /// Time spent doing I/Os (ms)
    pub io_time_ms: u64,
    /// Weighted time spent doing I/Os (ms)
    pub weighted_io_time_ms: u64,
}

impl DiskStat {
    pub fn bytes_read(&self) -> u64 {
        self.sectors_read.saturating_mul(SECTOR_SIZE)
    }

    pub fn bytes_written(&self) -> u64 {
        self.sectors_written.saturating_mul(SECTOR_SIZE)
    }
}

/// Parses one /proc/diskstats line.
///
/// Format: major minor name reads r_merged r_sectors r_time writes w_merged
/// w_sectors w_time in_flight io_time weighted_io_time [discard/flush ...]
///
/// Columns after the first fourteen (added in 4.18 and 5.5) are ignored.
pub fn parse_disk_stat_line(line: &str) -> Result<DiskStat, ParseError> {
    let mut cursor = Cursor::new(line);

    Ok(DiskStat {
        major: cursor.next_value("major")?,
        minor: cursor.next_value("minor")?,
        device: cursor
            .next_token_max("device", DEVICE_NAME_MAX_LEN)?
            .to_string(),
        reads_completed: cursor.next_value("reads_completed")?,
        reads_merged: cursor.next_value("reads_merged")?,
        sectors_read: cursor.next_value("sectors_read")?,
        read_time_ms: cursor.next_value("read_time_ms")?,
        writes_completed: cursor.next_value("writes_completed")?,
        writes_merged: cursor.next_value("writes_merged")?,
        sectors_written: cursor.next_value("sectors_written")?,
        write_time_ms: cursor.next_value("write_time_ms")?,
        in_flight: cursor.next_value("in_flight")?,
        io_time_ms: cursor.next_value("io_time_ms")?,
        weighted_io_time_ms: cursor.next_value("weighted_io_time_ms")?,
    })
}

/// Lazy sequence of [`DiskStat`], one per line of a diskstats snapshot.
///
/// Unlike the other extractors this one is best-effort: the first line that
/// fails to parse ends the sequence instead of failing the call, so a caller
/// may receive fewer records than there are devices. Once finished the
/// sequence stays finished.
#[derive(Debug, Clone)]
pub struct DiskStats {
    snapshot: Snapshot,
    pos: usize,
    done: bool,
    stopped_early: bool,
}

impl DiskStats {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            pos: 0,
            done: false,
            stopped_early: false,
        }
    }

    /// `true` once the scan has ended on a malformed line rather than at
    /// the end of the snapshot.
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }
}

impl Iterator for DiskStats {
    type Item = DiskStat;

    fn next(&mut self) -> Option<DiskStat> {
        if self.done {
            return None;
        }

        let (result, advance) = {
            let rest = &self.snapshot.text()[self.pos..];
            let (line, advance) = match rest.find('\n') {
                Some(end) => (&rest[..end], end + 1),
                None => (rest, rest.len()),
            };
            if line.trim().is_empty() {
                self.done = true;
                debug!(offset = self.pos, "end of diskstats");
                return None;
            }
            (parse_disk_stat_line(line), advance)
        };
        self.pos += advance;

        match result {
            Ok(stat) => Some(stat),
            Err(e) => {
                warn!(
                    error = %e,
                    truncated = self.snapshot.is_truncated(),
                    "malformed diskstats line, stopping scan"
                );
                self.done = true;
                self.stopped_early = true;
                None
            }
        }
    }
}

impl FusedIterator for DiskStats {}
