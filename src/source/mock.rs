//! In-memory metrics source for testing extractors without a real `/proc`.
//!
//! `MockSource` holds pseudo-file contents in a map and reports a configurable
//! filesystem magic, so both the happy path and the "not mounted" path can be
//! exercised on any host.

use super::{MetricsSource, PROC_SUPER_MAGIC, PROCFS_ROOT};
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// `f_type` of ext4, used to simulate a root that is not procfs.
pub const EXT4_SUPER_MAGIC: i64 = 0xef53;

#[derive(Debug, Clone)]
enum MockFile {
    Content(Vec<u8>),
    /// Opens fine, but every read fails.
    Unreadable,
}

/// In-memory metrics source.
#[derive(Debug)]
pub struct MockSource {
    root: PathBuf,
    magic: i64,
    files: HashMap<String, MockFile>,
    opens: AtomicUsize,
}

impl MockSource {
    /// Creates an empty source that reports the procfs magic.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(PROCFS_ROOT),
            magic: PROC_SUPER_MAGIC,
            files: HashMap::new(),
            opens: AtomicUsize::new(0),
        }
    }

    /// Creates an empty source whose root is not a proc filesystem.
    pub fn unmounted() -> Self {
        Self::new().with_magic(EXT4_SUPER_MAGIC)
    }

    pub fn with_magic(mut self, magic: i64) -> Self {
        self.magic = magic;
        self
    }

    /// Adds (or replaces) a pseudo-file.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files
            .insert(name.into(), MockFile::Content(content.into()));
    }

    /// Builder form of [`add_file`](Self::add_file).
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.add_file(name, content);
        self
    }

    /// Adds a pseudo-file whose reads fail with an I/O error.
    pub fn add_unreadable(&mut self, name: impl Into<String>) {
        self.files.insert(name.into(), MockFile::Unreadable);
    }

    /// Number of `open` calls served so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// A small but realistic set of `/proc` files.
    pub fn typical_system() -> Self {
        Self::new()
            .with_file(
                "stat",
                "cpu  74608 2520 24433 1117073 6176 4054 1743 0 0 0\n\
                 cpu0 37784 1264 12290 558035 3088 2038 870 0 0 0\n\
                 cpu1 36824 1256 12143 559038 3088 2016 873 0 0 0\n\
                 intr 1462898 0 0 0\n\
                 ctxt 2843591\n\
                 btime 1700000000\n",
            )
            .with_file("loadavg", "0.52 0.58 0.59 3/467 12345\n")
            .with_file(
                "meminfo",
                "MemTotal:       16303428 kB\n\
                 MemFree:         8049376 kB\n\
                 MemAvailable:   12391456 kB\n\
                 Buffers:          402592 kB\n\
                 Cached:          3862212 kB\n\
                 SwapCached:            0 kB\n\
                 Active:          4853024 kB\n\
                 SwapTotal:       2097148 kB\n\
                 SwapFree:        2097148 kB\n\
                 Shmem:            612004 kB\n",
            )
            .with_file(
                "diskstats",
                "   8       0 sda 52143 12034 3562982 21408 84511 61246 6823912 95832 0 63552 117240 0 0 0 0\n\
                 \x20  8       1 sda1 51998 12034 3556398 21355 84362 61246 6823912 95719 0 63452 117074 0 0 0 0\n\
                 \x20259       0 nvme0n1 90211 301 7418990 14823 150332 42011 9932190 70120 2 41210 84943 0 0 0 0\n",
            )
    }

    /// Loads every regular file directly under `dir` as a pseudo-file.
    ///
    /// Useful for regression tests against a copied `/proc` snapshot. The
    /// resulting source reports the procfs magic.
    pub fn from_dir(dir: &Path) -> io::Result<Self> {
        let mut source = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            source.add_file(name, std::fs::read(entry.path())?);
        }
        Ok(source)
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "simulated read failure"))
    }
}

impl MetricsSource for MockSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn filesystem_magic(&self) -> io::Result<i64> {
        Ok(self.magic)
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match self.files.get(name) {
            Some(MockFile::Content(bytes)) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            Some(MockFile::Unreadable) => Ok(Box::new(FailingReader)),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", self.root.join(name)),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_open_and_count() {
        let mut source = MockSource::new();
        source.add_file("loadavg", "1.00 1.00 1.00 1/1 1\n");

        let mut content = String::new();
        source
            .open("loadavg")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "1.00 1.00 1.00 1/1 1\n");
        assert_eq!(source.open_count(), 1);
    }

    #[test]
    fn test_mock_not_found() {
        let source = MockSource::new();
        let err = source.open("nonexistent").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(source.open_count(), 1);
    }

    #[test]
    fn test_mock_unreadable() {
        let mut source = MockSource::new();
        source.add_unreadable("stat");
        let mut buf = Vec::new();
        let err = source
            .open("stat")
            .unwrap()
            .read_to_end(&mut buf)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_mock_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("loadavg"), "0.01 0.02 0.03 1/50 7\n").unwrap();
        std::fs::create_dir(dir.path().join("1")).unwrap();

        let source = MockSource::from_dir(dir.path()).unwrap();
        assert_eq!(source.filesystem_magic().unwrap(), PROC_SUPER_MAGIC);
        assert!(source.open("loadavg").is_ok());
        assert!(source.open("1").is_err());
    }
}
