//! Single-file record store of consecutive fixed-size blocks
//!
//! Every operation opens the file, does its work and drops the handle before
//! returning. There is no locking: two writers on the same file interleave
//! unpredictably.

use crate::codec::{self, TextField};
use crate::error::{IoContext, Operation, Result, StoreError};
use crate::io::{BlockReader, StoreFile};
use crate::layout::{block_offset, HORSEPOWER_OFFSET, RECORD_SIZE};
use crate::record::Vehicle;
use std::fs::{File, Permissions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a keyed mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The first block with the key was changed
    Applied { index: u64 },
    /// No block carries the key; the file was not modified
    NotFound,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

/// Result of an append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appended {
    /// Block index of the new record
    pub index: u64,

    /// Text fields cut to fit the block
    pub truncated: Vec<TextField>,
}

/// Lazy scan over a store file, in file order
///
/// Yields `MalformedRecord` for a trailing partial block or an undecodable
/// block and then stops.
pub struct Scan {
    blocks: BlockReader<BufReader<File>>,
    failed: bool,
}

impl Iterator for Scan {
    type Item = Result<Vehicle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self
            .blocks
            .next_block()?
            .and_then(|(index, block)| codec::decode_at(index, &block));
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// Binary vehicle store backed by one file
///
/// # Examples
///
/// ```rust,no_run
/// use vehicle_store::{Outcome, RecordStore, Vehicle};
///
/// # fn main() -> vehicle_store::Result<()> {
/// let store = RecordStore::new("copies/vehicles.bin");
/// store.append(&Vehicle::new(1, "Civic", "Honda", 6.5, 120))?;
///
/// if store.update_horsepower(1, 150)? == Outcome::NotFound {
///     println!("no vehicle with id 1");
/// }
///
/// for vehicle in store.scan()? {
///     println!("{}", vehicle?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store at `path`; nothing is touched until an operation runs
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        RecordStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Number of records, from the file length
    pub fn count(&self) -> Result<u64> {
        StoreFile::open_read(&self.path)?.aligned_block_count()
    }

    /// Read every record from the start of the file
    ///
    /// Each call reopens the file, so a scan can be restarted at will.
    pub fn scan(&self) -> Result<Scan> {
        debug!("Scanning {:?}", self.path);
        let file = StoreFile::open_read(&self.path)?;
        Ok(Scan {
            blocks: file.into_blocks(),
            failed: false,
        })
    }

    /// Collect a full scan, failing on the first malformed block
    pub fn records(&self) -> Result<Vec<Vehicle>> {
        self.scan()?.collect()
    }

    /// Scan and print every record to `out`, returning what was printed
    pub fn list_to<W: Write>(&self, out: &mut W) -> Result<Vec<Vehicle>> {
        let mut listed = Vec::new();
        for vehicle in self.scan()? {
            let vehicle = vehicle?;
            writeln!(out, "{}", vehicle).map_err(StoreError::Console)?;
            listed.push(vehicle);
        }
        debug!("Listed {} records from {:?}", listed.len(), self.path);
        Ok(listed)
    }

    /// Append one record as a single block, creating the file if needed
    ///
    /// A file whose length is not a whole number of blocks is rejected
    /// before anything is written.
    pub fn append(&self, vehicle: &Vehicle) -> Result<Appended> {
        let encoded = encode_logged(vehicle);

        let mut file = StoreFile::open_append(&self.path)?;
        let index = file.aligned_block_count()?;
        file.append_block(&encoded.block)?;

        info!(
            "Appended vehicle {} ({} '{}') at block {} of {:?}",
            vehicle.id, vehicle.make, vehicle.model, index, self.path
        );
        Ok(Appended {
            index,
            truncated: encoded.truncated,
        })
    }

    /// Set the horsepower of the first record with `id`
    ///
    /// Only the four horsepower bytes of that block are rewritten.
    pub fn update_horsepower(&self, id: i32, horsepower: i32) -> Result<Outcome> {
        let mut file = StoreFile::open_read_write(&self.path)?;
        file.aligned_block_count()?;

        let found = {
            let mut blocks = file.blocks();
            let mut found = None;
            while let Some(item) = blocks.next_block() {
                let (index, block) = item?;
                if codec::decode_id(&block) == id {
                    found = Some(index);
                    break;
                }
            }
            found
        };

        let Some(index) = found else {
            debug!("Update: no vehicle with id {} in {:?}", id, self.path);
            return Ok(Outcome::NotFound);
        };

        let offset = block_offset(index) + HORSEPOWER_OFFSET as u64;
        file.write_at(offset, &codec::encode_horsepower(horsepower))?;

        info!(
            "Set horsepower of vehicle {} (block {}) to {} in {:?}",
            id, index, horsepower, self.path
        );
        Ok(Outcome::Applied { index })
    }

    /// Remove the first record with `id`
    ///
    /// All other blocks are copied in order into a temporary file next to the
    /// store, which then replaces the store with a single rename. On
    /// `NotFound` or any failure before the rename the store is untouched and
    /// the temporary file is removed.
    pub fn delete(&self, id: i32) -> Result<Outcome> {
        let source = StoreFile::open_read(&self.path)?;
        source.aligned_block_count()?;
        let permissions = std::fs::metadata(&self.path)
            .io_context(Operation::Metadata, &self.path)?
            .permissions();

        self.replace_without(source.into_blocks(), permissions, id)
    }

    /// Copy every block but the first with `id` into a sibling temporary
    /// file and rename it over the store
    fn replace_without<R: Read>(
        &self,
        mut blocks: BlockReader<R>,
        permissions: Permissions,
        id: i32,
    ) -> Result<Outcome> {
        let dir = parent_dir(&self.path);
        let prefix = format!(
            ".{}.",
            self.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)
            .io_context(Operation::CreateTemp, dir)?;
        let temp_path = temp.path().to_path_buf();
        debug!("Delete of id {} copying into {:?}", id, temp_path);

        let mut found = None;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            while let Some(item) = blocks.next_block() {
                let (index, block) = item?;
                if found.is_none() && codec::decode_id(&block) == id {
                    found = Some(index);
                    continue;
                }
                writer
                    .write_all(&block)
                    .io_context(Operation::Write, &temp_path)?;
            }
            writer.flush().io_context(Operation::Write, &temp_path)?;
        }

        let Some(index) = found else {
            debug!("Delete: no vehicle with id {} in {:?}", id, self.path);
            return Ok(Outcome::NotFound);
        };

        temp.as_file()
            .set_permissions(permissions)
            .io_context(Operation::Write, &temp_path)?;
        temp.as_file()
            .sync_all()
            .io_context(Operation::Sync, &temp_path)?;
        temp.persist(&self.path).map_err(|e| StoreError::Io {
            operation: Operation::Rename,
            path: self.path.clone(),
            source: e.error,
        })?;

        info!(
            "Deleted vehicle {} (block {}) from {:?}",
            id, index, self.path
        );
        Ok(Outcome::Applied { index })
    }

    /// Replace the whole file with `vehicles`, in order
    ///
    /// The file is truncated (or created) first.
    pub fn overwrite<'a, I>(&self, vehicles: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let blocks: Vec<[u8; RECORD_SIZE]> = vehicles
            .into_iter()
            .map(|vehicle| encode_logged(vehicle).block)
            .collect();

        let mut file = StoreFile::create(&self.path)?;
        let written = file.write_blocks(&blocks)?;
        file.sync()?;
        info!("Wrote {} records to {:?}", written, self.path);
        Ok(written)
    }
}

fn encode_logged(vehicle: &Vehicle) -> codec::Encoded {
    let encoded = codec::encode(vehicle);
    for field in &encoded.truncated {
        warn!(
            "Truncating {} of vehicle {} to its {}-byte field",
            field,
            vehicle.id,
            field.capacity()
        );
    }
    encoded
}

/// Directory holding `path`, `.` for a bare file name
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
