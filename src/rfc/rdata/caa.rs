//! CAA RR: https://datatracker.ietf.org/doc/html/rfc8659
use std::fmt;
use std::io::Cursor;

use byteorder::ReadBytesExt;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::char_string::CharacterString;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CAA {
    pub flags: u8, // bit 0 (0x80) is the critical flag
    pub tag: CharacterString,
    pub value: Vec<u8>, // the rest of the rdata, no length prefix
}

impl CAA {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let flags = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let mut tag = CharacterString::default();
        tag.from_network_bytes(rdr)?;
        if rdr.position() > end {
            return Err(CodecError::MalformedMessage.into());
        }
        let value = read_bytes(rdr, (end - rdr.position()) as usize)?;
        Ok(CAA { flags, tag, value })
    }
}

impl ToNetworkOrder for CAA {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u8(self.flags)?;
        let mut length = 1 + self.tag.to_network_bytes(wtr)?;
        wtr.write_all(&self.value);
        length += self.value.len();
        Ok(length)
    }
}

impl fmt::Display for CAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\"",
            self.flags,
            self.tag,
            String::from_utf8_lossy(&self.value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let caa = CAA {
            flags: 0,
            tag: CharacterString::from("issue"),
            value: b"letsencrypt.org".to_vec(),
        };

        let mut wtr = MessageWriter::new();
        let length = caa.to_network_bytes(&mut wtr).unwrap();

        let raw = wtr.into_bytes();
        assert_eq!(length, raw.len());

        let mut rdr = Cursor::new(raw.as_slice());
        let back = CAA::from_wire(&mut rdr, raw.len() as u64).unwrap();
        assert_eq!(back, caa);
    }
}
