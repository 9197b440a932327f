//! JSON array of vehicle objects

use super::{FormatKind, ReadReport, RecordFormat};
use crate::error::{IoContext, Operation, Result, StoreError};
use crate::record::Vehicle;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl RecordFormat for JsonFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Json
    }

    fn read(&self, path: &Path) -> Result<ReadReport> {
        debug!("Reading JSON from {:?}", path);
        let text = std::fs::read_to_string(path).io_context(Operation::Read, path)?;
        let elements: Vec<Value> =
            serde_json::from_str(&text).map_err(|source| json_error(path, source))?;

        let mut report = ReadReport::default();
        for (i, element) in elements.into_iter().enumerate() {
            match serde_json::from_value::<Vehicle>(element) {
                Ok(vehicle) => report.records.push(vehicle),
                Err(e) => report.skip(path, i + 1, e.to_string()),
            }
        }
        Ok(report)
    }

    fn write(&self, path: &Path, vehicles: &[Vehicle]) -> Result<()> {
        // JSON has no NaN or infinity; serde_json would write null
        if let Some(vehicle) = vehicles.iter().find(|v| !v.fuel_consumption.is_finite()) {
            return Err(StoreError::InvalidInput(format!(
                "vehicle {} has fuel consumption {}, which JSON cannot represent",
                vehicle.id, vehicle.fuel_consumption
            )));
        }

        let json =
            serde_json::to_string_pretty(vehicles).map_err(|source| json_error(path, source))?;
        std::fs::write(path, json).io_context(Operation::Write, path)?;
        debug!("Wrote {} vehicles to {:?}", vehicles.len(), path);
        Ok(())
    }
}

fn json_error(path: &Path, source: serde_json::Error) -> StoreError {
    StoreError::Json {
        path: path.to_path_buf(),
        source,
    }
}
