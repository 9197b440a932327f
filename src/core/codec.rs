//! Fixed-width binary codec for [`Vehicle`] records
//!
//! Numerics are big-endian. Text is UTF-8, right-padded with spaces to the
//! field capacity. Text longer than the capacity is cut at the last character
//! boundary that fits; the encoder reports which fields were cut so callers
//! can surface the data loss.

use crate::error::{Result, StoreError};
use crate::layout::{
    FUEL_OFFSET, FUEL_RANGE, HORSEPOWER_OFFSET, HORSEPOWER_RANGE, HORSEPOWER_SIZE, ID_OFFSET,
    ID_RANGE, MAKE_RANGE, MAKE_SIZE, MODEL_RANGE, MODEL_SIZE, RECORD_SIZE, TEXT_PAD,
};
use crate::record::Vehicle;
use std::fmt;

/// Text fields subject to truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Model,
    Make,
}

impl TextField {
    /// Bytes available to this field in a block
    pub fn capacity(&self) -> usize {
        match self {
            TextField::Model => MODEL_SIZE,
            TextField::Make => MAKE_SIZE,
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextField::Model => f.write_str("model"),
            TextField::Make => f.write_str("make"),
        }
    }
}

/// Result of encoding one record
#[derive(Debug, Clone)]
pub struct Encoded {
    pub block: [u8; RECORD_SIZE],

    /// Fields that did not fit and were truncated
    pub truncated: Vec<TextField>,
}

impl Encoded {
    pub fn is_lossless(&self) -> bool {
        self.truncated.is_empty()
    }
}

/// Encode a record into one block
pub fn encode(vehicle: &Vehicle) -> Encoded {
    let mut block = [TEXT_PAD; RECORD_SIZE];
    let mut truncated = Vec::new();

    block[ID_RANGE].copy_from_slice(&vehicle.id.to_be_bytes());

    if write_text(&mut block[MODEL_RANGE], &vehicle.model) {
        truncated.push(TextField::Model);
    }
    if write_text(&mut block[MAKE_RANGE], &vehicle.make) {
        truncated.push(TextField::Make);
    }

    block[FUEL_RANGE].copy_from_slice(&vehicle.fuel_consumption.to_be_bytes());
    block[HORSEPOWER_RANGE].copy_from_slice(&encode_horsepower(vehicle.horsepower));

    Encoded { block, truncated }
}

/// Decode one block
///
/// `bytes` must be exactly [`RECORD_SIZE`] long.
pub fn decode(bytes: &[u8]) -> Result<Vehicle> {
    decode_at(0, bytes)
}

/// Decode block number `index`, used for error context
pub fn decode_at(index: u64, bytes: &[u8]) -> Result<Vehicle> {
    let block: &[u8; RECORD_SIZE] = bytes.try_into().map_err(|_| {
        StoreError::malformed(
            index,
            format!("expected {} bytes, got {}", RECORD_SIZE, bytes.len()),
        )
    })?;

    let model = read_text(index, TextField::Model, &block[MODEL_RANGE])?;
    let make = read_text(index, TextField::Make, &block[MAKE_RANGE])?;

    Ok(Vehicle {
        id: decode_id(block),
        model,
        make,
        fuel_consumption: f64::from_be_bytes(array(block, FUEL_OFFSET)),
        horsepower: i32::from_be_bytes(array(block, HORSEPOWER_OFFSET)),
    })
}

/// Read only the key of a block
pub fn decode_id(block: &[u8; RECORD_SIZE]) -> i32 {
    i32::from_be_bytes(array(block, ID_OFFSET))
}

/// Bytes written at [`HORSEPOWER_OFFSET`] by an in-place update
pub fn encode_horsepower(horsepower: i32) -> [u8; HORSEPOWER_SIZE] {
    horsepower.to_be_bytes()
}

/// The record `decode(encode(vehicle))` yields: text cut to capacity and
/// trailing whitespace removed
pub fn canonical(vehicle: &Vehicle) -> Vehicle {
    Vehicle {
        model: fit(&vehicle.model, MODEL_SIZE).0.trim_end().to_string(),
        make: fit(&vehicle.make, MAKE_SIZE).0.trim_end().to_string(),
        ..vehicle.clone()
    }
}

fn array<const N: usize>(block: &[u8; RECORD_SIZE], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&block[offset..offset + N]);
    out
}

/// Longest prefix of `text` that fits in `capacity` bytes without splitting
/// a character, and whether anything was cut
fn fit(text: &str, capacity: usize) -> (&str, bool) {
    if text.len() <= capacity {
        return (text, false);
    }
    let mut end = capacity;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}

/// Copy text into a pre-padded field; returns true when truncated
fn write_text(field: &mut [u8], text: &str) -> bool {
    let (fitted, truncated) = fit(text, field.len());
    field[..fitted.len()].copy_from_slice(fitted.as_bytes());
    truncated
}

fn read_text(index: u64, field: TextField, bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        StoreError::malformed(index, format!("{} field is not valid UTF-8: {}", field, e))
    })?;
    Ok(text.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civic() -> Vehicle {
        Vehicle::new(1, "Civic", "Honda", 6.5, 120)
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode(&civic());
        let block = encoded.block;

        assert!(encoded.is_lossless());
        assert_eq!(&block[ID_RANGE], &1i32.to_be_bytes());
        assert_eq!(&block[MODEL_RANGE][..5], b"Civic");
        assert!(block[MODEL_RANGE][5..].iter().all(|&b| b == b' '));
        assert_eq!(&block[MAKE_RANGE][..5], b"Honda");
        assert_eq!(&block[FUEL_RANGE], &6.5f64.to_be_bytes());
        assert_eq!(&block[HORSEPOWER_RANGE], &120i32.to_be_bytes());
    }

    #[test]
    fn test_round_trip() {
        let vehicle = Vehicle::new(-7, "Model S Plaid", "Tesla", 0.0, i32::MAX);
        let decoded = decode(&encode(&vehicle).block).unwrap();
        assert_eq!(decoded, vehicle);
    }

    #[test]
    fn test_long_text_truncated_to_capacity() {
        let long_model = "X".repeat(55);
        let vehicle = Vehicle::new(3, long_model, "Make", 5.0, 90);

        let encoded = encode(&vehicle);
        assert_eq!(encoded.truncated, vec![TextField::Model]);

        let decoded = decode(&encoded.block).unwrap();
        assert_eq!(decoded.model.len(), TextField::Model.capacity());
        assert_eq!(decoded.model, "X".repeat(MODEL_SIZE));
        assert_eq!(decoded, canonical(&vehicle));
    }

    #[test]
    fn test_field_capacity() {
        assert_eq!(TextField::Model.capacity(), MODEL_RANGE.len());
        assert_eq!(TextField::Make.capacity(), MAKE_RANGE.len());
        assert_eq!(TextField::Make.capacity(), 40);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 39 ASCII bytes followed by a 2-byte character cannot fit in 40
        let model = format!("{}é", "a".repeat(39));
        let encoded = encode(&Vehicle::new(4, model, "Seat", 5.5, 100));

        assert_eq!(encoded.truncated, vec![TextField::Model]);
        let decoded = decode(&encoded.block).unwrap();
        assert_eq!(decoded.model, "a".repeat(39));
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let vehicle = Vehicle::new(5, "Ibiza  ", " Seat", 5.1, 95);
        let decoded = decode(&encode(&vehicle).block).unwrap();

        assert_eq!(decoded.model, "Ibiza");
        // Leading whitespace is data
        assert_eq!(decoded.make, " Seat");
        assert_eq!(decoded, canonical(&vehicle));
    }

    #[test]
    fn test_decode_rejects_short_block() {
        let block = encode(&civic()).block;
        let err = decode(&block[..RECORD_SIZE - 1]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_decode_rejects_long_block() {
        let mut bytes = encode(&civic()).block.to_vec();
        bytes.push(0);
        assert!(decode(&bytes).unwrap_err().is_malformed());
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let mut block = encode(&civic()).block;
        block[MAKE_RANGE.start] = 0xFF;

        match decode_at(9, &block) {
            Err(StoreError::MalformedRecord { index, reason }) => {
                assert_eq!(index, 9);
                assert!(reason.contains("make"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_id_and_horsepower_bytes() {
        let block = encode(&Vehicle::new(42, "A", "B", 1.0, 2)).block;
        assert_eq!(decode_id(&block), 42);
        assert_eq!(&block[HORSEPOWER_RANGE], &encode_horsepower(2));
    }
}
