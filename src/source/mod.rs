//! Access to the kernel metrics pseudo-filesystem.
//!
//! `MetricsSource` is the seam between the extractors and the environment:
//! the real implementation (`ProcFs`) queries `statfs(2)` and opens files
//! under `/proc`, while `MockSource` serves in-memory content for tests.

pub mod mock;

use crate::error::SourceError;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub use mock::MockSource;

/// Default mount point of the proc filesystem.
pub const PROCFS_ROOT: &str = "/proc";

/// `f_type` reported by `statfs(2)` for procfs (`linux/magic.h`).
pub const PROC_SUPER_MAGIC: i64 = 0x9fa0;

/// A directory of named pseudo-files holding live kernel metrics.
pub trait MetricsSource: Send + Sync {
    /// Root directory the pseudo-files are resolved against.
    fn root(&self) -> &Path;

    /// Filesystem type magic of the root, as reported by `statfs(2)`.
    fn filesystem_magic(&self) -> io::Result<i64>;

    /// Opens the pseudo-file `name` (relative to the root) for reading.
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Verifies that `source` is backed by a mounted proc filesystem.
///
/// Every extraction calls this before touching a snapshot file; on failure no
/// file under the root is opened.
pub fn ensure_source_mounted<S: MetricsSource + ?Sized>(source: &S) -> Result<(), SourceError> {
    match source.filesystem_magic() {
        Ok(PROC_SUPER_MAGIC) => Ok(()),
        Ok(magic) => Err(SourceError::Unavailable {
            root: source.root().to_path_buf(),
            reason: format!("filesystem magic {:#x}, expected {:#x}", magic, PROC_SUPER_MAGIC),
        }),
        Err(e) => Err(SourceError::Unavailable {
            root: source.root().to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// The real `/proc` filesystem (or procfs mounted elsewhere).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(PROCFS_ROOT)
    }
}

impl MetricsSource for ProcFs {
    fn root(&self) -> &Path {
        &self.root
    }

    #[cfg(target_os = "linux")]
    fn filesystem_magic(&self) -> io::Result<i64> {
        use std::ffi::CString;
        use std::mem::MaybeUninit;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(self.root.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut statfs = MaybeUninit::<libc::statfs>::uninit();

        let result = unsafe { libc::statfs(c_path.as_ptr(), statfs.as_mut_ptr()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        let statfs = unsafe { statfs.assume_init() };
        #[allow(clippy::unnecessary_cast)]
        let magic = statfs.f_type as i64;
        Ok(magic)
    }

    #[cfg(not(target_os = "linux"))]
    fn filesystem_magic(&self) -> io::Result<i64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "proc filesystem is only available on Linux",
        ))
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.root.join(name))?;
        Ok(Box::new(file))
    }
}
