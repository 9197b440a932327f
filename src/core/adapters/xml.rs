//! XML document `<coches>` with one `<coche>` element per vehicle
//!
//! ```xml
//! <coches>
//!   <coche>
//!     <id_coche>1</id_coche>
//!     <nombre_modelo>Civic</nombre_modelo>
//!     <nombre_marca>Honda</nombre_marca>
//!     <consumo>6.5</consumo>
//!     <HP>120</HP>
//!   </coche>
//! </coches>
//! ```
//!
//! Element text is trimmed on read, so surrounding whitespace in `model` or
//! `make` does not survive an XML round trip. The other formats keep it.

use super::{FormatKind, ReadReport, RecordFormat};
use crate::error::{IoContext, Operation, Result, StoreError};
use crate::record::Vehicle;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const INDENT: usize = 2;

#[derive(Serialize)]
#[serde(rename = "coches")]
struct Document<'a> {
    #[serde(rename = "coche")]
    vehicles: &'a [Vehicle],
}

/// Parsed leniently so one bad element does not reject the document
#[derive(Deserialize)]
struct RawDocument {
    #[serde(rename = "coche", default)]
    entries: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    id_coche: Option<String>,
    nombre_modelo: Option<String>,
    nombre_marca: Option<String>,
    consumo: Option<String>,
    #[serde(rename = "HP")]
    hp: Option<String>,
}

impl RawEntry {
    fn into_vehicle(self) -> std::result::Result<Vehicle, String> {
        Ok(Vehicle {
            id: parse_field("id_coche", self.id_coche)?,
            model: trimmed(self.nombre_modelo),
            make: trimmed(self.nombre_marca),
            fuel_consumption: parse_field("consumo", self.consumo)?,
            horsepower: parse_field("HP", self.hp)?,
        })
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_field<T>(name: &str, value: Option<String>) -> std::result::Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    let value = value.ok_or_else(|| format!("missing <{}>", name))?;
    value
        .trim()
        .parse()
        .map_err(|e| format!("invalid <{}> {:?}: {}", name, value, e))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormat;

impl RecordFormat for XmlFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Xml
    }

    fn read(&self, path: &Path) -> Result<ReadReport> {
        debug!("Reading XML from {:?}", path);
        let text = std::fs::read_to_string(path).io_context(Operation::Read, path)?;
        let document: RawDocument =
            quick_xml::de::from_str(&text).map_err(|e| xml_error(path, e))?;

        let mut report = ReadReport::default();
        for (i, entry) in document.entries.into_iter().enumerate() {
            match entry.into_vehicle() {
                Ok(vehicle) => report.records.push(vehicle),
                Err(reason) => report.skip(path, i + 1, reason),
            }
        }
        Ok(report)
    }

    fn write(&self, path: &Path, vehicles: &[Vehicle]) -> Result<()> {
        let mut xml = String::new();
        let mut serializer = Serializer::new(&mut xml);
        serializer.indent(' ', INDENT);
        Document { vehicles }
            .serialize(serializer)
            .map_err(|e| xml_error(path, e))?;
        xml.push('\n');

        std::fs::write(path, xml).io_context(Operation::Write, path)?;
        debug!("Wrote {} vehicles to {:?}", vehicles.len(), path);
        Ok(())
    }
}

fn xml_error(path: &Path, error: impl Display) -> StoreError {
    StoreError::Xml {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
