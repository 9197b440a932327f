//! Disk I/O for record store files

use crate::error::{IoContext, Operation, Result, StoreError};
use crate::layout::{block_count, RECORD_SIZE};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Outcome of filling one block buffer from a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    Full,
    Eof,
    /// Reader ended after this many bytes of a block
    Partial(usize),
}

/// Read until `buf` is full or the reader is exhausted
pub(crate) fn fill_block<R: Read>(reader: &mut R, buf: &mut [u8; RECORD_SIZE]) -> io::Result<Fill> {
    let mut filled = 0;
    while filled < RECORD_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(match filled {
        0 => Fill::Eof,
        RECORD_SIZE => Fill::Full,
        n => Fill::Partial(n),
    })
}

/// Sequential reader yielding raw blocks with their index
///
/// A trailing partial block is reported once as `MalformedRecord`; after any
/// error the reader stays exhausted.
pub struct BlockReader<R> {
    reader: R,
    path: PathBuf,
    index: u64,
    done: bool,
}

impl<R: Read> BlockReader<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        BlockReader {
            reader,
            path: path.into(),
            index: 0,
            done: false,
        }
    }

    pub fn next_block(&mut self) -> Option<Result<(u64, [u8; RECORD_SIZE])>> {
        if self.done {
            return None;
        }

        let mut block = [0u8; RECORD_SIZE];
        let fill = match fill_block(&mut self.reader, &mut block) {
            Ok(fill) => fill,
            Err(e) => {
                self.done = true;
                return Some(Err(StoreError::Io {
                    operation: Operation::Read,
                    path: self.path.clone(),
                    source: e,
                }));
            }
        };

        match fill {
            Fill::Full => {
                let index = self.index;
                self.index += 1;
                Some(Ok((index, block)))
            }
            Fill::Eof => {
                self.done = true;
                None
            }
            Fill::Partial(n) => {
                self.done = true;
                Some(Err(StoreError::malformed(
                    self.index,
                    format!(
                        "trailing partial block of {} bytes (expected {})",
                        n, RECORD_SIZE
                    ),
                )))
            }
        }
    }
}

/// Open handle on a store file
///
/// The handle is released when the value is dropped, so every exit path of
/// a store operation closes the file.
pub struct StoreFile {
    file: File,
    path: PathBuf,
}

impl StoreFile {
    /// Open an existing file for reading
    pub fn open_read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).io_context(Operation::Open, path)?;
        Ok(StoreFile {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing file for in-place writes
    pub fn open_read_write<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .io_context(Operation::Open, path)?;
        Ok(StoreFile {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Open for appending, creating the file if absent
    pub fn open_append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .io_context(Operation::Open, path)?;
        Ok(StoreFile {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Create or truncate a file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .io_context(Operation::Open, path)?;
        Ok(StoreFile {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn len(&self) -> Result<u64> {
        let metadata = self
            .file
            .metadata()
            .io_context(Operation::Metadata, &self.path)?;
        Ok(metadata.len())
    }

    /// Number of blocks in the file; a length that is not a whole number of
    /// blocks is `MalformedRecord`
    pub fn aligned_block_count(&self) -> Result<u64> {
        let (blocks, remainder) = block_count(self.len()?);
        if remainder != 0 {
            return Err(StoreError::malformed(
                blocks,
                format!(
                    "store length leaves {} trailing bytes (not a multiple of {})",
                    remainder, RECORD_SIZE
                ),
            ));
        }
        Ok(blocks)
    }

    /// Buffered block reader over this handle, starting at the current position
    pub fn blocks(&mut self) -> BlockReader<BufReader<&mut File>> {
        BlockReader::new(BufReader::new(&mut self.file), self.path.clone())
    }

    /// Consume the handle into a buffered block reader
    pub fn into_blocks(self) -> BlockReader<BufReader<File>> {
        BlockReader::new(BufReader::new(self.file), self.path)
    }

    /// Append one block with a single write
    ///
    /// If the write fails the file is truncated back to its previous length
    /// on a best-effort basis; the original error is returned either way.
    pub fn append_block(&mut self, block: &[u8; RECORD_SIZE]) -> Result<u64> {
        let before = self.len()?;

        if let Err(e) = self.file.write_all(block).and_then(|_| self.file.flush()) {
            if let Err(rollback) = self.file.set_len(before) {
                warn!(
                    "Could not roll back partial append to {:?}: {}",
                    self.path, rollback
                );
            }
            return Err(StoreError::Io {
                operation: Operation::Write,
                path: self.path.clone(),
                source: e,
            });
        }

        Ok(before)
    }

    /// Write all blocks in order from the current position
    pub fn write_blocks<'a, I>(&mut self, blocks: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a [u8; RECORD_SIZE]>,
    {
        let path = self.path.clone();
        let mut writer = io::BufWriter::new(&mut self.file);
        let mut written = 0;
        for block in blocks {
            writer.write_all(block).io_context(Operation::Write, &path)?;
            written += 1;
        }
        writer.flush().io_context(Operation::Write, &path)?;
        Ok(written)
    }

    /// Overwrite bytes at an absolute offset
    pub fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(offset))
            .io_context(Operation::Seek, &self.path)?;
        self.file
            .write_all(bytes)
            .io_context(Operation::Write, &self.path)?;
        self.file.flush().io_context(Operation::Write, &self.path)?;
        Ok(())
    }

    /// Sync data and metadata to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all().io_context(Operation::Sync, &self.path)
    }
}
