use serde::{Deserialize, Serialize};
use std::fmt;

/// One vehicle entry
///
/// The same type is stored in binary blocks and exchanged through the CSV,
/// XML and JSON adapters. Serde names match the field names used by the
/// existing interchange files (`id_coche`, `nombre_modelo`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Key within a store file (not enforced unique)
    #[serde(rename = "id_coche")]
    pub id: i32,

    /// Model name, stored in 40 bytes
    #[serde(rename = "nombre_modelo")]
    pub model: String,

    /// Manufacturer name, stored in 40 bytes
    #[serde(rename = "nombre_marca")]
    pub make: String,

    #[serde(rename = "consumo")]
    pub fuel_consumption: f64,

    #[serde(rename = "HP")]
    pub horsepower: i32,
}

impl Vehicle {
    pub fn new(
        id: i32,
        model: impl Into<String>,
        make: impl Into<String>,
        fuel_consumption: f64,
        horsepower: i32,
    ) -> Self {
        Vehicle {
            id,
            model: model.into(),
            make: make.into(),
            fuel_consumption,
            horsepower,
        }
    }

    /// Copy of this record with a different horsepower
    pub fn with_horsepower(&self, horsepower: i32) -> Self {
        Vehicle {
            horsepower,
            ..self.clone()
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Model: {}, Make: {}, Consumption: {:?}, Horsepower: {}",
            self.id, self.model, self.make, self.fuel_consumption, self.horsepower
        )
    }
}
