//! Word codec
//!
//! Encoding and decoding of length-prefixed words.
//!
//! ## Length Prefix
//! ```text
//! ┌──────────────────────┬───────────────────────────────────────────┐
//! │ Length               │ Encoding                                  │
//! ├──────────────────────┼───────────────────────────────────────────┤
//! │ 0x00 - 0x7F          │ 0xxxxxxx                                  │
//! │ 0x80 - 0x3FFF        │ 10xxxxxx xxxxxxxx                         │
//! │ 0x4000 - 0x1FFFFF    │ 110xxxxx xxxxxxxx xxxxxxxx                │
//! │ 0x200000 - 0xFFFFFFF │ 1110xxxx xxxxxxxx xxxxxxxx xxxxxxxx       │
//! │ 0x10000000 -         │ 11110000 xxxxxxxx xxxxxxxx xxxxxxxx x...  │
//! └──────────────────────┴───────────────────────────────────────────┘
//! ```
//!
//! All multi-byte lengths are big-endian. Leading bytes 0xF8..=0xFF are
//! reserved for control bytes and rejected when decoding.

use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{ApiError, Result};

/// Largest prefix: marker byte + 4 length bytes
pub const MAX_PREFIX_SIZE: usize = 5;

/// Largest length the prefix can carry
pub const MAX_ENCODABLE_LEN: u64 = u32::MAX as u64;

// =============================================================================
// Length Encoding/Decoding
// =============================================================================

/// Append the length prefix for `len` to `buf`
pub fn put_length<B: BufMut>(buf: &mut B, len: u32) {
    if len < 0x80 {
        buf.put_u8(len as u8);
    } else if len < 0x4000 {
        buf.put_u16((len | 0x8000) as u16);
    } else if len < 0x20_0000 {
        let v = len | 0xC0_0000;
        buf.put_u8((v >> 16) as u8);
        buf.put_u16(v as u16);
    } else if len < 0x1000_0000 {
        buf.put_u32(len | 0xE000_0000);
    } else {
        buf.put_u8(0xF0);
        buf.put_u32(len);
    }
}

/// Encode a length prefix to bytes
pub fn encode_length(len: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MAX_PREFIX_SIZE);
    put_length(&mut buf, len);
    buf
}

/// Total prefix size (in bytes) announced by the leading byte
pub fn prefix_size(first: u8) -> Result<usize> {
    if first & 0x80 == 0x00 {
        Ok(1)
    } else if first & 0xC0 == 0x80 {
        Ok(2)
    } else if first & 0xE0 == 0xC0 {
        Ok(3)
    } else if first & 0xF0 == 0xE0 {
        Ok(4)
    } else if first & 0xF8 == 0xF0 {
        Ok(5)
    } else {
        Err(ApiError::Protocol(format!(
            "Invalid length prefix byte: 0x{:02x}",
            first
        )))
    }
}

/// Combine a complete prefix (as sized by [`prefix_size`]) into a length
fn assemble_length(prefix: &[u8]) -> u32 {
    let (first, rest) = match prefix.split_first() {
        Some(split) => split,
        None => return 0,
    };

    // The 5-byte form carries no length bits in its marker byte
    let mut len = match prefix.len() {
        1 => u32::from(first & 0x7F),
        2 => u32::from(first & 0x3F),
        3 => u32::from(first & 0x1F),
        4 => u32::from(first & 0x0F),
        _ => 0,
    };

    for byte in rest {
        len = (len << 8) | u32::from(*byte);
    }
    len
}

/// Decode a length prefix from bytes
///
/// Returns the length and the number of prefix bytes consumed
pub fn decode_length(bytes: &[u8]) -> Result<(u32, usize)> {
    let first = *bytes.first().ok_or_else(|| {
        ApiError::Protocol("Incomplete length prefix: no bytes".to_string())
    })?;

    let size = prefix_size(first)?;
    if bytes.len() < size {
        return Err(ApiError::Protocol(format!(
            "Incomplete length prefix: expected {} bytes, got {}",
            size,
            bytes.len()
        )));
    }

    Ok((assemble_length(&bytes[..size]), size))
}

// =============================================================================
// Word Encoding/Decoding
// =============================================================================

/// Append one encoded word (prefix + raw bytes) to `buf`
pub fn encode_word(buf: &mut BytesMut, word: &[u8]) -> Result<()> {
    let len = u32::try_from(word.len()).map_err(|_| {
        ApiError::Protocol(format!(
            "Word too long: {} bytes (max {})",
            word.len(),
            MAX_ENCODABLE_LEN
        ))
    })?;

    buf.reserve(MAX_PREFIX_SIZE + word.len());
    put_length(buf, len);
    buf.put_slice(word);
    Ok(())
}

/// Decode one word from bytes
///
/// Returns the word and the total number of bytes consumed
pub fn decode_word(bytes: &[u8]) -> Result<(Vec<u8>, usize)> {
    let (len, prefix_len) = decode_length(bytes)?;
    let total_len = prefix_len + len as usize;

    if bytes.len() < total_len {
        return Err(ApiError::Protocol(format!(
            "Incomplete word: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[prefix_len..total_len].to_vec(), total_len))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a length prefix from a stream
///
/// A stream that ends before the prefix is complete yields `ConnectionClosed`
pub fn read_length<R: Read>(reader: &mut R) -> Result<u32> {
    let mut prefix = [0u8; MAX_PREFIX_SIZE];
    reader
        .read_exact(&mut prefix[..1])
        .map_err(ApiError::from_stream)?;

    let size = prefix_size(prefix[0])?;
    if size > 1 {
        reader
            .read_exact(&mut prefix[1..size])
            .map_err(ApiError::from_stream)?;
    }

    Ok(assemble_length(&prefix[..size]))
}

/// Read one word from a stream
///
/// Blocks until the whole word has arrived. Words announced as longer than
/// `max_len` are rejected before any payload is read.
pub fn read_word<R: Read>(reader: &mut R, max_len: u32) -> Result<Vec<u8>> {
    let len = read_length(reader)?;

    if len > max_len {
        return Err(ApiError::Protocol(format!(
            "Word too long: {} bytes (max {})",
            len, max_len
        )));
    }

    let mut word = vec![0u8; len as usize];
    if len > 0 {
        reader.read_exact(&mut word).map_err(ApiError::from_stream)?;
    }
    Ok(word)
}

/// Write one word to a stream
pub fn write_word<W: Write>(writer: &mut W, word: &[u8]) -> Result<()> {
    let mut buf = BytesMut::new();
    encode_word(&mut buf, word)?;
    writer.write_all(&buf).map_err(ApiError::from_stream)?;
    Ok(())
}
