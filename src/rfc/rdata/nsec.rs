//! NSEC RR and the type bitmap shared with NSEC3:
//! https://datatracker.ietf.org/doc/html/rfc4034#section-4
use std::fmt;
use std::io::Cursor;

use byteorder::ReadBytesExt;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;
use crate::rfc::qtype::QType;

/// The window-block encoding of RFC4034 §4.1.2. Types are kept as a sorted
/// list of codes; the blocks are materialized on write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeBitmap {
    types: Vec<u16>,
}

impl TypeBitmap {
    pub fn from_types(mut types: Vec<u16>) -> Self {
        types.sort_unstable();
        types.dedup();
        Self { types }
    }

    pub fn contains(&self, qtype: &QType) -> bool {
        self.types.binary_search(&qtype.code()).is_ok()
    }

    pub fn types(&self) -> impl Iterator<Item = QType> + '_ {
        self.types.iter().map(|code| QType::from(*code))
    }

    pub fn read(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut types = Vec::new();

        while rdr.position() < end {
            let window = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)? as u16;
            let length = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)? as usize;
            if length == 0 || length > 32 {
                return Err(CodecError::MalformedMessage.into());
            }
            let block = read_bytes(rdr, length)?;

            for (index, byte) in block.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (0x80 >> bit) != 0 {
                        types.push(window << 8 | (index as u16 * 8 + bit));
                    }
                }
            }
        }

        Ok(Self { types })
    }

    pub fn write(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        let mut length = 0usize;
        let mut index = 0usize;

        while index < self.types.len() {
            let window = self.types[index] >> 8;

            // all codes of this window, as (byte offset, bit) positions
            let mut block = [0u8; 32];
            let mut block_len = 0usize;
            while index < self.types.len() && self.types[index] >> 8 == window {
                let low = self.types[index] & 0xFF;
                block[low as usize / 8] |= 0x80 >> (low % 8);
                block_len = low as usize / 8 + 1;
                index += 1;
            }

            wtr.write_u8(window as u8)?;
            wtr.write_u8(block_len as u8)?;
            wtr.write_all(&block[..block_len]);
            length += 2 + block_len;
        }

        Ok(length)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NSEC {
    pub next: DomainName, // next owner name in canonical zone order
    pub types: TypeBitmap,
}

impl NSEC {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut next = DomainName::default();
        next.from_network_bytes(rdr)?;
        let types = TypeBitmap::read(rdr, end)?;
        Ok(NSEC { next, types })
    }
}

impl ToNetworkOrder for NSEC {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.set_rdata_compression(false);
        let mut length = self.next.to_network_bytes(wtr)?;
        length += self.types.write(wtr)?;
        Ok(length)
    }
}

impl fmt::Display for NSEC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.next)?;
        for qtype in self.types.types() {
            write!(f, " {}", qtype)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_roundtrip() {
        // A, MX, RRSIG, NSEC and the high window of CAA (257)
        let bitmap = TypeBitmap::from_types(vec![1, 15, 46, 47, 257]);

        let mut wtr = MessageWriter::new();
        let length = bitmap.write(&mut wtr).unwrap();

        let raw = wtr.into_bytes();
        assert_eq!(length, raw.len());
        // window 0 needs 6 bytes (bit 47), window 1 needs 1 byte
        assert_eq!(raw[0], 0);
        assert_eq!(raw[1], 6);
        assert_eq!(raw[8], 1);
        assert_eq!(raw[9], 1);

        let mut rdr = Cursor::new(raw.as_slice());
        let back = TypeBitmap::read(&mut rdr, raw.len() as u64).unwrap();
        assert_eq!(back, bitmap);

        assert!(back.contains(&QType::A));
        assert!(back.contains(&QType::CAA));
        assert!(!back.contains(&QType::AAAA));
    }

    #[test]
    fn nsec_roundtrip() {
        let nsec = NSEC {
            next: "beta.example.com".parse().unwrap(),
            types: TypeBitmap::from_types(vec![1, 2, 46, 47]),
        };

        let mut wtr = MessageWriter::new();
        let length = nsec.to_network_bytes(&mut wtr).unwrap();

        let raw = wtr.into_bytes();
        assert_eq!(length, raw.len());

        let mut rdr = Cursor::new(raw.as_slice());
        let back = NSEC::from_wire(&mut rdr, raw.len() as u64).unwrap();
        assert_eq!(back, nsec);
    }
}
