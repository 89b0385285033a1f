//! Encoded polyline codec.
//!
//! The format stores each coordinate as a pair of signed deltas from the
//! previous point, scaled to 1e-5 degrees, zig-zag encoded and split into
//! little-endian 5-bit chunks. Every chunk except the last of a value carries
//! the 0x20 continuation bit; chunks are offset by 63 into printable ASCII.
//!
//! Coordinates come back as geo types with x = longitude, y = latitude.

use geo::{Coord, LineString};

const PRECISION: f64 = 1e5;
const ASCII_OFFSET: u8 = 63;
const CONTINUATION: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;
// 32-bit deltas fit in seven 5-bit chunks
const MAX_SHIFT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("polyline ended mid-value at byte {offset}")]
    Truncated { offset: usize },

    #[error("byte {byte:#04x} at offset {offset} is outside the polyline alphabet")]
    InvalidByte { offset: usize, byte: u8 },

    #[error("value starting before byte {offset} does not fit in 32 bits")]
    Overflow { offset: usize },
}

/// Decode a polyline string. An empty string decodes to an empty line.
pub fn decode(encoded: &str) -> Result<LineString<f64>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut coords = Vec::with_capacity(bytes.len() / 4);

    while cursor < bytes.len() {
        lat += next_value(bytes, &mut cursor)?;
        lng += next_value(bytes, &mut cursor)?;

        coords.push(Coord {
            x: lng as f64 / PRECISION,
            y: lat as f64 / PRECISION,
        });
    }

    Ok(LineString::new(coords))
}

fn next_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, DecodeError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let offset = *cursor;
        let byte = *bytes.get(offset).ok_or(DecodeError::Truncated { offset })?;
        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(DecodeError::InvalidByte { offset, byte });
        }
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { offset });
        }

        let chunk = (byte - ASCII_OFFSET) as i64;
        *cursor += 1;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk < CONTINUATION {
            break;
        }
    }

    // zig-zag
    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode coordinates (x = longitude, y = latitude) at 1e-5 precision.
pub fn encode<I>(coords: I) -> String
where
    I: IntoIterator<Item = Coord<f64>>,
{
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for coord in coords {
        let lat = (coord.y * PRECISION).round() as i64;
        let lng = (coord.x * PRECISION).round() as i64;

        push_value(lat - prev_lat, &mut out);
        push_value(lng - prev_lng, &mut out);

        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn push_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION {
        out.push((((value & CHUNK_MASK) | CONTINUATION) as u8 + ASCII_OFFSET) as char);
        value >>= 5;
    }
    out.push((value as u8 + ASCII_OFFSET) as char);
}
