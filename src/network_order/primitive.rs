//! Codec impls for the primitive building blocks. Read failures on a
//! truncated buffer are always reported as `MalformedMessage`: the wire gave
//! us fewer bytes than the structure requires.
use std::io::{Cursor, Read, Result};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{CodecError, DNSResult};
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};

impl ToNetworkOrder for u8 {
    /// ```
    /// use recursor::network_order::{MessageWriter, ToNetworkOrder};
    ///
    /// let mut wtr = MessageWriter::new();
    /// assert!(255_u8.to_network_bytes(&mut wtr).is_ok());
    /// assert_eq!(wtr.as_slice(), &[0xFF]);
    /// ```
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> Result<usize> {
        wtr.write_u8(*self)?;
        Ok(1)
    }
}

impl FromNetworkOrder for u8 {
    fn from_network_bytes(&mut self, rdr: &mut Cursor<&[u8]>) -> DNSResult<()> {
        *self = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        Ok(())
    }
}

impl ToNetworkOrder for u16 {
    /// ```
    /// use recursor::network_order::{MessageWriter, ToNetworkOrder};
    ///
    /// let mut wtr = MessageWriter::new();
    /// assert!(0x1234_u16.to_network_bytes(&mut wtr).is_ok());
    /// assert_eq!(wtr.as_slice(), &[0x12, 0x34]);
    /// ```
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> Result<usize> {
        wtr.write_u16(*self)?;
        Ok(2)
    }
}

impl FromNetworkOrder for u16 {
    fn from_network_bytes(&mut self, rdr: &mut Cursor<&[u8]>) -> DNSResult<()> {
        *self = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        Ok(())
    }
}

impl ToNetworkOrder for u32 {
    /// ```
    /// use recursor::network_order::{MessageWriter, ToNetworkOrder};
    ///
    /// let mut wtr = MessageWriter::new();
    /// assert!(0x12345678_u32.to_network_bytes(&mut wtr).is_ok());
    /// assert_eq!(wtr.as_slice(), &[0x12, 0x34, 0x56, 0x78]);
    /// ```
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> Result<usize> {
        wtr.write_u32(*self)?;
        Ok(4)
    }
}

impl FromNetworkOrder for u32 {
    fn from_network_bytes(&mut self, rdr: &mut Cursor<&[u8]>) -> DNSResult<()> {
        *self = rdr
            .read_u32::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        Ok(())
    }
}

impl<const N: usize> ToNetworkOrder for [u8; N] {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> Result<usize> {
        wtr.write_all(self);
        Ok(N)
    }
}

impl<const N: usize> FromNetworkOrder for [u8; N] {
    fn from_network_bytes(&mut self, rdr: &mut Cursor<&[u8]>) -> DNSResult<()> {
        rdr.read_exact(self)
            .map_err(|_| CodecError::MalformedMessage)?;
        Ok(())
    }
}

impl ToNetworkOrder for &[u8] {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> Result<usize> {
        wtr.write_all(self);
        Ok(self.len())
    }
}

impl<T: ToNetworkOrder> ToNetworkOrder for Option<T> {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> Result<usize> {
        match self {
            None => Ok(0),
            Some(value) => value.to_network_bytes(wtr),
        }
    }
}

// sections are just records back to back; the count lives in the header
impl<T: ToNetworkOrder> ToNetworkOrder for Vec<T> {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> Result<usize> {
        let mut length = 0usize;
        for item in self {
            length += item.to_network_bytes(wtr)?;
        }
        Ok(length)
    }
}

/// Read exactly `length` raw bytes (opaque rdata, signatures, keys).
pub fn read_bytes(rdr: &mut Cursor<&[u8]>, length: usize) -> DNSResult<Vec<u8>> {
    let mut raw = vec![0u8; length];
    rdr.read_exact(&mut raw)
        .map_err(|_| CodecError::MalformedMessage)?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::DNSError;

    #[test]
    fn truncated_read_is_malformed() {
        let raw = [0x12u8];
        let mut rdr = Cursor::new(raw.as_slice());
        let mut v = 0u32;
        assert!(matches!(
            v.from_network_bytes(&mut rdr),
            Err(DNSError::Codec(CodecError::MalformedMessage))
        ));
    }

    #[test]
    fn fixed_array() {
        let mut wtr = MessageWriter::new();
        let octets = [1u8, 2, 3, 4];
        assert_eq!(octets.to_network_bytes(&mut wtr).unwrap(), 4);

        let raw = wtr.into_bytes();
        let mut rdr = Cursor::new(raw.as_slice());
        let mut back = [0u8; 4];
        back.from_network_bytes(&mut rdr).unwrap();
        assert_eq!(back, octets);
    }

    #[test]
    fn opaque_bytes() {
        let raw = [1u8, 2, 3, 4, 5];
        let mut rdr = Cursor::new(raw.as_slice());
        assert_eq!(read_bytes(&mut rdr, 3).unwrap(), &[1, 2, 3]);
        assert!(read_bytes(&mut rdr, 3).is_err());
    }
}
