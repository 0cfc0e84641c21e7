//! Error types for source checks, snapshot reads and field parsing.

use std::io;
use std::path::PathBuf;

/// The metrics pseudo-filesystem is missing or is not procfs.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("proc filesystem not mounted on {}: {reason}", .root.display())]
    Unavailable { root: PathBuf, reason: String },
}

/// A named snapshot file could not be opened or read.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("'{}' not found", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read file '{}'", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while splitting snapshot text into fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The delimiter that ends a required field was not found.
    #[error("{0} not found")]
    FieldMissing(&'static str),

    /// A field exceeded the defensive length bound.
    #[error("{field} is larger than the buffer: {len} > {max} bytes")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The field was present but is not a valid number.
    #[error("invalid {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

/// Any failure of a single extraction call.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ExtractError {
    /// Name of the missing field, if this is a `FieldMissing` failure.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            ExtractError::Parse(ParseError::FieldMissing(name)) => Some(name),
            _ => None,
        }
    }

    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, ExtractError::Source(SourceError::Unavailable { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_missing_message() {
        let err = ParseError::FieldMissing("idle");
        assert_eq!(err.to_string(), "idle not found");
    }

    #[test]
    fn test_extract_error_helpers() {
        let err: ExtractError = ParseError::FieldMissing("steal").into();
        assert_eq!(err.missing_field(), Some("steal"));
        assert!(!err.is_source_unavailable());

        let err: ExtractError = SourceError::Unavailable {
            root: PathBuf::from("/proc"),
            reason: "filesystem magic 0xef53".to_string(),
        }
        .into();
        assert!(err.is_source_unavailable());
        assert_eq!(err.missing_field(), None);
        assert_eq!(
            err.to_string(),
            "proc filesystem not mounted on /proc: filesystem magic 0xef53"
        );
    }
}
