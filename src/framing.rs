//! Length-prefixed binary framing used by the persistence helpers (cache
//! snapshots). This is not the DNS wire format: lengths below 128 take one
//! byte, larger ones are announced by `0x80 | n` followed by `n` big-endian
//! bytes, 1 <= n <= 4.
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CodecError, DNSResult};

/// ```
/// use recursor::framing::write_length;
///
/// let mut buf = Vec::new();
/// write_length(&mut buf, 5).unwrap();
/// assert_eq!(buf, &[5]);
///
/// let mut buf = Vec::new();
/// write_length(&mut buf, 300).unwrap();
/// assert_eq!(buf, &[0x82, 0x01, 0x2c]);
/// ```
pub fn write_length(buf: &mut Vec<u8>, length: usize) -> DNSResult<()> {
    if length < 128 {
        buf.write_u8(length as u8)?;
        return Ok(());
    }

    // how many big-endian bytes are needed to carry the value
    let be = (length as u32).to_be_bytes();
    let skip = be.iter().take_while(|x| **x == 0).count();
    let n = be.len() - skip;

    buf.write_u8(0x80 | n as u8)?;
    buf.extend_from_slice(&be[skip..]);
    Ok(())
}

pub fn read_length(rdr: &mut Cursor<&[u8]>) -> DNSResult<usize> {
    let first = rdr.read_u8()?;
    if first & 0x80 == 0 {
        return Ok(first as usize);
    }

    let n = (first & 0x7F) as usize;
    if n == 0 || n > 4 {
        return Err(CodecError::InvalidLengthPrefix.into());
    }

    let mut length = 0usize;
    for _ in 0..n {
        length = (length << 8) | rdr.read_u8()? as usize;
    }
    Ok(length)
}

// Strings are length-prefixed UTF-8, 1-byte length, 255 max.
pub fn write_string(buf: &mut Vec<u8>, s: &str) -> DNSResult<()> {
    if s.len() > 255 {
        return Err(CodecError::LabelTooLong.into());
    }
    buf.write_u8(s.len() as u8)?;
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

pub fn read_string(rdr: &mut Cursor<&[u8]>) -> DNSResult<String> {
    let length = rdr.read_u8()? as usize;
    let mut raw = vec![0u8; length];
    rdr.read_exact(&mut raw)?;
    Ok(String::from_utf8(raw)?)
}

// Timestamps are persisted as 64-bit big-endian milliseconds since the Unix epoch.
pub fn write_timestamp(buf: &mut Vec<u8>, millis: u64) -> DNSResult<()> {
    buf.write_u64::<BigEndian>(millis)?;
    Ok(())
}

pub fn read_timestamp(rdr: &mut Cursor<&[u8]>) -> DNSResult<u64> {
    Ok(rdr.read_u64::<BigEndian>()?)
}
