//! One-shot reads of a single pseudo-file.

use crate::error::SnapshotError;
use crate::source::MetricsSource;
use std::io::Read;
use tracing::debug;

/// Bytes read from a pseudo-file per snapshot unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 4096;

/// The content of one pseudo-file, read once at one point in time.
///
/// Content beyond the reader's capacity is dropped; `is_truncated` reports
/// whether that may have happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    name: String,
    text: String,
    truncated: bool,
}

impl Snapshot {
    /// Wraps text that was obtained elsewhere (e.g. by an adapter or a test).
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            truncated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Reads snapshots with a fixed byte capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotReader {
    capacity: usize,
}

impl SnapshotReader {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Opens `name` under the source root and reads up to `capacity` bytes.
    ///
    /// Memory grows with the file rather than with the capacity, so a very
    /// large capacity only lifts the bound.
    pub fn read<S: MetricsSource + ?Sized>(
        &self,
        source: &S,
        name: &str,
    ) -> Result<Snapshot, SnapshotError> {
        let path = source.root().join(name);
        let file = source.open(name).map_err(|e| SnapshotError::NotFound {
            path: path.clone(),
            source: e,
        })?;

        // One byte past the capacity tells a file that fits exactly apart
        // from one that was cut short.
        let mut buf = Vec::with_capacity(self.capacity.min(DEFAULT_CAPACITY));
        file.take((self.capacity as u64).saturating_add(1))
            .read_to_end(&mut buf)
            .map_err(|e| SnapshotError::ReadFailed { path, source: e })?;

        let truncated = buf.len() > self.capacity;
        if truncated {
            buf.truncate(self.capacity);
            debug!(file = name, capacity = self.capacity, "snapshot truncated at read capacity");
        }

        let text = match String::from_utf8(buf) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        debug!(file = name, bytes = text.len(), "read snapshot");

        Ok(Snapshot {
            name: name.to_string(),
            text,
            truncated,
        })
    }
}

impl Default for SnapshotReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `name` from `source` with the default capacity.
pub fn read_snapshot<S: MetricsSource + ?Sized>(
    source: &S,
    name: &str,
) -> Result<Snapshot, SnapshotError> {
    SnapshotReader::new().read(source, name)
}
