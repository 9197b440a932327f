//! Fixed-width binary blocks, delegated to [`RecordStore`]

use super::{FormatKind, ReadReport, RecordFormat};
use crate::error::Result;
use crate::record::Vehicle;
use crate::store::RecordStore;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFormat;

impl RecordFormat for BinaryFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Binary
    }

    /// Strict: a malformed block fails the whole read
    fn read(&self, path: &Path) -> Result<ReadReport> {
        Ok(ReadReport {
            records: RecordStore::new(path).records()?,
            skipped: Vec::new(),
        })
    }

    fn write(&self, path: &Path, vehicles: &[Vehicle]) -> Result<()> {
        RecordStore::new(path).overwrite(vehicles)?;
        Ok(())
    }
}
