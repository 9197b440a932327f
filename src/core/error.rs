use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What the store was doing when an I/O call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Read,
    Write,
    Seek,
    Sync,
    Truncate,
    CreateTemp,
    Rename,
    CreateDir,
    Metadata,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Open => "open",
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Seek => "seek",
            Operation::Sync => "sync",
            Operation::Truncate => "truncate",
            Operation::CreateTemp => "create temporary file",
            Operation::Rename => "rename",
            Operation::CreateDir => "create directory",
            Operation::Metadata => "read metadata",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Malformed record at block {index}: {reason}")]
    MalformedRecord { index: u64, reason: String },

    #[error("I/O error during {operation} on {}: {source}", path.display())]
    Io {
        operation: Operation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML error in {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Console I/O error: {0}")]
    Console(#[source] io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StoreError {
    pub(crate) fn malformed(index: u64, reason: impl Into<String>) -> Self {
        StoreError::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    /// True for `MalformedRecord`
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::MalformedRecord { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Attach operation and path context to raw `io::Result`s
pub(crate) trait IoContext<T> {
    fn io_context(self, operation: Operation, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context(self, operation: Operation, path: &Path) -> Result<T> {
        self.map_err(|source| StoreError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        })
    }
}
