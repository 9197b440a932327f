//! Batch conversion between all four formats
//!
//! Every source found in the input directory is written back out in every
//! format, so four sources produce sixteen files:
//!
//! ```text
//! data_in/vehicles.csv  ─┐            ┌─ data_out/vehiclesCSV.csv
//! data_in/vehicles.xml  ─┤  Converter ├─ data_out/vehiclesCSV.xml
//! data_in/vehicles.json ─┤ ─────────► ├─ ...
//! data_in/vehicles.bin  ─┘            └─ data_out/vehiclesBIN.bin
//! ```

use crate::adapters::FormatKind;
use crate::config::Config;
use crate::error::{IoContext, Operation, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Create `dir` and its parents if missing; returns true if it was created
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<bool> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(dir).io_context(Operation::CreateDir, dir)?;
    info!("Created directory {:?}", dir);
    Ok(true)
}

/// One source that was loaded
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSummary {
    pub kind: FormatKind,
    pub path: PathBuf,
    pub records: usize,
    pub skipped: usize,
}

/// One source or target that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub sources: Vec<SourceSummary>,
    pub failures: Vec<Failure>,
    pub written: Vec<PathBuf>,
}

impl ConversionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.sources.iter().all(|s| s.skipped == 0)
    }
}

/// Converts every source format into every target format
pub struct Converter<'a> {
    config: &'a Config,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Converter { config }
    }

    /// Run the full conversion
    ///
    /// Missing or unreadable sources and failed writes are recorded in the
    /// report and do not stop the run. Only failing to create the output
    /// directory is fatal.
    pub fn run(&self) -> Result<ConversionReport> {
        ensure_dir(&self.config.output_dir)?;
        let mut report = ConversionReport::default();

        for source in FormatKind::ALL {
            let path = self.config.source_path(source);
            if !path.is_file() {
                warn!("Source {:?} not found, skipping {}", path, source);
                report.failures.push(Failure {
                    reason: "source file not found".to_string(),
                    path,
                });
                continue;
            }

            let read = match source.adapter().read(&path) {
                Ok(read) => read,
                Err(e) => {
                    warn!("Could not read {:?}: {}", path, e);
                    report.failures.push(Failure {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            debug!(
                "Loaded {} vehicles from {:?} ({} skipped)",
                read.records.len(),
                path,
                read.skipped.len()
            );

            for target in FormatKind::ALL {
                let out = self.config.output_path(source, target);
                match target.adapter().write(&out, &read.records) {
                    Ok(()) => {
                        info!("Saved {} vehicles to {:?}", read.records.len(), out);
                        report.written.push(out);
                    }
                    Err(e) => {
                        warn!("Could not write {:?}: {}", out, e);
                        report.failures.push(Failure {
                            path: out,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            report.sources.push(SourceSummary {
                kind: source,
                path,
                records: read.records.len(),
                skipped: read.skipped.len(),
            });
        }

        info!(
            "Conversion finished: {} sources, {} files written, {} failures",
            report.sources.len(),
            report.written.len(),
            report.failures.len()
        );
        Ok(report)
    }
}
