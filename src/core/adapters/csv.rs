//! Semicolon-delimited text, one vehicle per row, no header row
//!
//! Column order: `id;model;make;fuel_consumption;horsepower`.

use super::{FormatKind, ReadReport, RecordFormat};
use crate::error::{Result, StoreError};
use crate::record::Vehicle;
use ::csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::Path;
use tracing::debug;

const DELIMITER: u8 = b';';
const COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl RecordFormat for CsvFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Csv
    }

    fn read(&self, path: &Path) -> Result<ReadReport> {
        debug!("Reading CSV from {:?}", path);
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| csv_error(path, source))?;

        let mut report = ReadReport::default();
        for (row, result) in reader.records().enumerate() {
            let position = row + 1;
            let record = match result {
                Ok(record) => record,
                // Invalid UTF-8 and similar row-level failures are skippable;
                // I/O failures are not.
                Err(e) if e.is_io_error() => return Err(csv_error(path, e)),
                Err(e) => {
                    report.skip(path, position, e.to_string());
                    continue;
                }
            };
            match parse_row(&record) {
                Ok(vehicle) => report.records.push(vehicle),
                Err(reason) => report.skip(path, position, reason),
            }
        }

        debug!(
            "Read {} vehicles from {:?} ({} skipped)",
            report.records.len(),
            path,
            report.skipped.len()
        );
        Ok(report)
    }

    fn write(&self, path: &Path, vehicles: &[Vehicle]) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_path(path)
            .map_err(|source| csv_error(path, source))?;

        for vehicle in vehicles {
            writer
                .write_record([
                    vehicle.id.to_string(),
                    vehicle.model.clone(),
                    vehicle.make.clone(),
                    format!("{:?}", vehicle.fuel_consumption),
                    vehicle.horsepower.to_string(),
                ])
                .map_err(|source| csv_error(path, source))?;
        }
        writer
            .flush()
            .map_err(|source| csv_error(path, source.into()))?;

        debug!("Wrote {} vehicles to {:?}", vehicles.len(), path);
        Ok(())
    }
}

fn csv_error(path: &Path, source: ::csv::Error) -> StoreError {
    StoreError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn parse_row(record: &StringRecord) -> std::result::Result<Vehicle, String> {
    if record.len() < COLUMNS {
        return Err(format!(
            "expected {} columns, found {}: {:?}",
            COLUMNS,
            record.len(),
            record.iter().collect::<Vec<_>>()
        ));
    }

    let field = |i: usize| record.get(i).unwrap_or_default().trim();
    let id = field(0)
        .parse::<i32>()
        .map_err(|e| format!("invalid id {:?}: {}", field(0), e))?;
    let fuel_consumption = field(3)
        .parse::<f64>()
        .map_err(|e| format!("invalid fuel consumption {:?}: {}", field(3), e))?;
    let horsepower = field(4)
        .parse::<i32>()
        .map_err(|e| format!("invalid horsepower {:?}: {}", field(4), e))?;

    Ok(Vehicle {
        id,
        model: record.get(1).unwrap_or_default().to_string(),
        make: record.get(2).unwrap_or_default().to_string(),
        fuel_consumption,
        horsepower,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_skips_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vehicles.csv");
        std::fs::write(
            &path,
            "1;Civic;Honda;6.5;120\n\
             x;Bad;Row;1.0;1\n\
             2;Golf;VW\n\
             3;Clio;Renault;5.2;90\n",
        )
        .unwrap();

        let report = CsvFormat.read(&path).unwrap();

        assert_eq!(
            report.records,
            vec![
                Vehicle::new(1, "Civic", "Honda", 6.5, 120),
                Vehicle::new(3, "Clio", "Renault", 5.2, 90),
            ]
        );
        let positions: Vec<_> = report.skipped.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![2, 3]);
    }

    #[test]
    fn test_write_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        CsvFormat
            .write(&path, &[Vehicle::new(2, "Golf", "VW", 7.0, 110)])
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2;Golf;VW;7.0;110\n");
    }

    #[test]
    fn test_write_quotes_delimiter_in_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let vehicles = vec![Vehicle::new(5, "A;B", "Make", 1.5, 10)];

        CsvFormat.write(&path, &vehicles).unwrap();
        assert_eq!(CsvFormat.read(&path).unwrap().records, vehicles);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = CsvFormat.read(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(StoreError::Csv { .. })));
    }
}
