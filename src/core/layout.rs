//! Fixed block layout of the binary record store
//!
//! Every record occupies exactly [`RECORD_SIZE`] bytes. There is no file
//! header, footer or record count: block `n` lives at byte `n * RECORD_SIZE`.
//!
//! ```text
//! ┌────────┬──────┬──────────────────────┐
//! │ Offset │ Size │ Field                │
//! ├────────┼──────┼──────────────────────┤
//! │      0 │    4 │ id (i32, BE)         │
//! │      4 │   40 │ model (UTF-8, 0x20)  │
//! │     44 │   40 │ make (UTF-8, 0x20)   │
//! │     84 │    8 │ fuel (f64, BE)       │
//! │     92 │    4 │ horsepower (i32, BE) │
//! └────────┴──────┴──────────────────────┘
//! ```
//!
//! Offsets are derived from the sizes below; nothing else in the crate
//! hardcodes a byte position.

use std::mem::size_of;
use std::ops::Range;

pub const ID_SIZE: usize = size_of::<i32>();
pub const MODEL_SIZE: usize = 40;
pub const MAKE_SIZE: usize = 40;
pub const FUEL_SIZE: usize = size_of::<f64>();
pub const HORSEPOWER_SIZE: usize = size_of::<i32>();

pub const ID_OFFSET: usize = 0;
pub const MODEL_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const MAKE_OFFSET: usize = MODEL_OFFSET + MODEL_SIZE;
pub const FUEL_OFFSET: usize = MAKE_OFFSET + MAKE_SIZE;
pub const HORSEPOWER_OFFSET: usize = FUEL_OFFSET + FUEL_SIZE;

/// Size of one on-disk block (96 bytes)
pub const RECORD_SIZE: usize = HORSEPOWER_OFFSET + HORSEPOWER_SIZE;

/// Padding byte for text fields
pub const TEXT_PAD: u8 = b' ';

pub const ID_RANGE: Range<usize> = ID_OFFSET..MODEL_OFFSET;
pub const MODEL_RANGE: Range<usize> = MODEL_OFFSET..MAKE_OFFSET;
pub const MAKE_RANGE: Range<usize> = MAKE_OFFSET..FUEL_OFFSET;
pub const FUEL_RANGE: Range<usize> = FUEL_OFFSET..HORSEPOWER_OFFSET;
pub const HORSEPOWER_RANGE: Range<usize> = HORSEPOWER_OFFSET..RECORD_SIZE;

/// Byte offset of block `index` within a store file
pub fn block_offset(index: u64) -> u64 {
    index * RECORD_SIZE as u64
}

/// Number of whole blocks in a file of `len` bytes and the leftover byte count
pub fn block_count(len: u64) -> (u64, u64) {
    (len / RECORD_SIZE as u64, len % RECORD_SIZE as u64)
}
