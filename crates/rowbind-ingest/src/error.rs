//! Error types for row sources and streaming decoding.

use rowbind_map::{ConfigError, DecodeError};
use thiserror::Error;

/// Failure to produce a raw row.
#[derive(Debug, Error)]
pub enum RowError {
    /// The CSV tokenizer rejected the input.
    #[error("failed to read CSV row: {0}")]
    Csv(#[from] csv::Error),

    /// Reading the underlying stream failed.
    #[error("failed to read row: {0}")]
    Io(#[from] std::io::Error),

    /// A row source reported a row it could not represent.
    #[error("malformed row {row}: {message}")]
    Malformed { row: u64, message: String },
}

/// Errors surfaced while streaming records.
///
/// `row` is the 1-based number of the physical row read from the source,
/// counting a discovered header row.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Source Errors ===
    /// The row source failed; the stream can continue at the next row.
    #[error("row {row}: {source}")]
    Row {
        row: u64,
        #[source]
        source: RowError,
    },

    // === Configuration Errors ===
    /// The header or the record's bindings are unusable.
    #[error("invalid record configuration: {0}")]
    Config(#[from] ConfigError),

    // === Decode Errors ===
    /// One row failed to decode; the stream can continue at the next row.
    #[error("row {row}: {source}")]
    Decode {
        row: u64,
        #[source]
        source: DecodeError,
    },
}

impl IngestError {
    /// Row number the error refers to, if any.
    pub fn row(&self) -> Option<u64> {
        match self {
            Self::Row { row, .. } | Self::Decode { row, .. } => Some(*row),
            Self::Config(_) => None,
        }
    }

    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::Row {
            row: 3,
            source: RowError::Malformed {
                row: 3,
                message: "unterminated quote".to_string(),
            },
        };
        assert_eq!(err.to_string(), "row 3: malformed row 3: unterminated quote");
        assert_eq!(err.row(), Some(3));
    }

    #[test]
    fn test_error_from_config() {
        let err: IngestError = ConfigError::NoHeaders.into();
        assert!(matches!(err, IngestError::Config(ConfigError::NoHeaders)));
        assert_eq!(err.row(), None);
        assert_eq!(err.as_config(), Some(&ConfigError::NoHeaders));
        assert!(err.as_decode().is_none());
    }
}
