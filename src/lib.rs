//! # vehicle-store - Fixed-Width Binary Vehicle Records
//!
//! `vehicle-store` keeps vehicle records in a flat binary file of 96-byte
//! blocks and converts them to and from CSV, XML and JSON:
//!
//! - **Record store** with scan, append, in-place horsepower update and
//!   delete-by-rewrite
//! - **Codec** with a fixed big-endian layout and reported text truncation
//! - **Format adapters** that skip malformed text rows instead of failing
//! - **Conversion pipeline** that writes every source in every format
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vehicle_store::{RecordStore, Result, Vehicle};
//!
//! # fn main() -> Result<()> {
//! let store = RecordStore::new("copies/vehicles.bin");
//!
//! store.append(&Vehicle::new(1, "Civic", "Honda", 6.5, 120))?;
//! store.append(&Vehicle::new(2, "Golf", "VW", 7.0, 110))?;
//!
//! store.update_horsepower(1, 150)?;
//! store.delete(2)?;
//!
//! for vehicle in store.scan()? {
//!     println!("{}", vehicle?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Converting
//!
//! ```rust,no_run
//! use vehicle_store::{Config, Converter, Result};
//!
//! # fn main() -> Result<()> {
//! let config = Config::load("vehicle-store.toml")?;
//! let report = Converter::new(&config).run()?;
//! println!("wrote {} files", report.written.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## File Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Block 0 (96 bytes)                           │
//! │  id i32 │ model 40B │ make 40B │ f64 │ i32   │
//! ├──────────────────────────────────────────────┤
//! │ Block 1 (96 bytes)                           │
//! ├──────────────────────────────────────────────┤
//! │ ...                                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! No header and no record count: the file length is the only metadata and
//! must stay a multiple of [`RECORD_SIZE`].

pub mod convert;
pub mod core;
pub mod menu;

// Short paths for the core modules
#[allow(unused_imports)]
pub(crate) use crate::core::{adapters, codec, config, error, io, layout, record, store};

pub use crate::convert::{ensure_dir, ConversionReport, Converter};
pub use crate::core::{
    adapters::{FormatKind, ReadReport, RecordFormat, SkippedEntry},
    codec::{Encoded, TextField},
    config::Config,
    error::{Operation, Result, StoreError},
    layout::RECORD_SIZE,
    record::Vehicle,
    store::{Appended, Outcome, RecordStore, Scan},
};
pub use crate::menu::Menu;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
