//! Interchange formats for vehicle records
//!
//! Each adapter is a stateless unit struct implementing [`RecordFormat`].
//! Text adapters skip malformed rows and report them in [`ReadReport`];
//! the binary adapter is strict and fails on the first malformed block.

pub mod binary;
pub mod csv;
pub mod json;
pub mod xml;

use crate::error::Result;
use crate::record::Vehicle;
use std::fmt;
use std::path::Path;
use tracing::warn;

pub use self::binary::BinaryFormat;
pub use self::csv::CsvFormat;
pub use self::json::JsonFormat;
pub use self::xml::XmlFormat;

/// Supported encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Csv,
    Xml,
    Json,
    Binary,
}

impl FormatKind {
    /// Conversion order used by the pipeline
    pub const ALL: [FormatKind; 4] = [
        FormatKind::Csv,
        FormatKind::Xml,
        FormatKind::Json,
        FormatKind::Binary,
    ];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            FormatKind::Csv => "csv",
            FormatKind::Xml => "xml",
            FormatKind::Json => "json",
            FormatKind::Binary => "bin",
        }
    }

    /// Upper-case tag used in converted file names (`vehiclesCSV.json`)
    pub fn tag(&self) -> &'static str {
        match self {
            FormatKind::Csv => "CSV",
            FormatKind::Xml => "XML",
            FormatKind::Json => "JSON",
            FormatKind::Binary => "BIN",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        FormatKind::ALL
            .into_iter()
            .find(|kind| kind.extension() == ext)
    }

    /// Adapter for this format
    pub fn adapter(&self) -> &'static dyn RecordFormat {
        match self {
            FormatKind::Csv => &CsvFormat,
            FormatKind::Xml => &XmlFormat,
            FormatKind::Json => &JsonFormat,
            FormatKind::Binary => &BinaryFormat,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An input entry that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// 1-based row or element number in the source
    pub position: usize,
    pub reason: String,
}

/// Records read from a source plus what was skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    pub records: Vec<Vehicle>,
    pub skipped: Vec<SkippedEntry>,
}

impl ReadReport {
    pub(crate) fn skip(&mut self, source: &Path, position: usize, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("Skipping entry {} of {:?}: {}", position, source, reason);
        self.skipped.push(SkippedEntry { position, reason });
    }
}

/// Produce or consume a sequence of records in one encoding
pub trait RecordFormat {
    fn kind(&self) -> FormatKind;

    /// Read all records from `path`
    ///
    /// An unreadable file or an unparsable document is an error; single
    /// malformed entries are skipped where the format allows it.
    fn read(&self, path: &Path) -> Result<ReadReport>;

    /// Write `vehicles` to `path`, truncating or creating it first
    fn write(&self, path: &Path, vehicles: &[Vehicle]) -> Result<()>;
}
