//! Length codec
//!
//! Encoding and decoding of the RouterOS variable-width word length
//! prefix. Every word on the wire is preceded by its byte length in
//! one of five forms, selected by the magnitude of the length.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────────────────────────┬─────────┬──────────────────────┐
//! │ Length range                 │ Bytes   │ Encoded value (BE)   │
//! ├──────────────────────────────┼─────────┼──────────────────────┤
//! │ 0x0        .. 0x80           │ 1       │ n                    │
//! │ 0x80       .. 0x4000         │ 2       │ n + 0x8000           │
//! │ 0x4000     .. 0x200000       │ 3       │ n + 0xC00000         │
//! │ 0x200000   .. 0x10000000     │ 4       │ n + 0xE0000000       │
//! │ 0x10000000 .. 0x100000000    │ 1 + 4   │ 0xF0 then n verbatim │
//! └──────────────────────────────┴─────────┴──────────────────────┘
//! ```
//!
//! Lengths of 2^32 and above cannot be framed and are rejected before
//! any bytes are written.

use std::io::Read;

use bytes::BufMut;

use crate::error::{ApiError, Result};

/// Largest word length the framing can carry (2^32 - 1)
pub const MAX_WORD_LENGTH: u64 = 0xFFFF_FFFF;

/// Marker byte introducing the 5-byte extended length form
const EXTENDED_FORM: u8 = 0xF0;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a word length into its wire form
///
/// Returns the 1 to 5 byte big-endian prefix, or [`ApiError::WordTooLong`]
/// for lengths at or above 2^32.
pub fn encode_length(n: u64) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(5);
    put_length(n, &mut buf)?;
    Ok(buf)
}

/// Append the wire form of a word length to an existing buffer
pub fn put_length(n: u64, buf: &mut impl BufMut) -> Result<()> {
    if n < 0x80 {
        buf.put_u8(n as u8);
    } else if n < 0x4000 {
        buf.put_u16((n + 0x8000) as u16);
    } else if n < 0x20_0000 {
        buf.put_uint(n + 0xC0_0000, 3);
    } else if n < 0x1000_0000 {
        buf.put_u32((n + 0xE000_0000) as u32);
    } else if n <= MAX_WORD_LENGTH {
        // Extended form: sentinel byte, then the length verbatim
        buf.put_u8(EXTENDED_FORM);
        buf.put_u32(n as u32);
    } else {
        return Err(ApiError::WordTooLong(n));
    }
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a word length from a byte source
///
/// Exact inverse of [`encode_length`]: round-trips every value in
/// `[0, 2^32)`. The first byte selects the form; continuation bytes are
/// combined big-endian and the form's offset subtracted. A first byte
/// above 0xF0 is a reserved control byte and fails with
/// [`ApiError::InvalidLength`].
pub fn decode_length(r: &mut impl Read) -> Result<u64> {
    let first = read_u8(r)?;

    match first {
        0x00..=0x7F => Ok(u64::from(first)),
        0x80..=0xBF => {
            let n = combine(first, &read_bytes::<1>(r)?);
            Ok(n - 0x8000)
        }
        0xC0..=0xDF => {
            let n = combine(first, &read_bytes::<2>(r)?);
            Ok(n - 0xC0_0000)
        }
        0xE0..=0xEF => {
            let n = combine(first, &read_bytes::<3>(r)?);
            Ok(n - 0xE000_0000)
        }
        EXTENDED_FORM => {
            let rest = read_bytes::<4>(r)?;
            Ok(u64::from(u32::from_be_bytes(rest)))
        }
        _ => Err(ApiError::InvalidLength(first)),
    }
}

/// Combine a first byte and its continuation bytes big-endian
fn combine(first: u8, rest: &[u8]) -> u64 {
    rest.iter()
        .fold(u64::from(first), |acc, &b| (acc << 8) | u64::from(b))
}

fn read_u8(r: &mut impl Read) -> Result<u8> {
    Ok(read_bytes::<1>(r)?[0])
}

/// Read exactly N bytes; an EOF inside a length prefix means the peer
/// closed the connection mid-frame.
fn read_bytes<const N: usize>(r: &mut impl Read) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ApiError::ConnectionBroken
        } else {
            ApiError::Io(e)
        }
    })?;
    Ok(buf)
}
