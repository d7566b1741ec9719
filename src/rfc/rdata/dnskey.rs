//! DNSKEY RR: https://datatracker.ietf.org/doc/html/rfc4034#section-2
use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use data_encoding::BASE64;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{MessageWriter, ToNetworkOrder};
use crate::rfc::rdata::algorithm::Algorithm;

// DNSKEY flag bits
const FLAG_ZONE_KEY: u16 = 0x0100;
const FLAG_SEP: u16 = 0x0001;

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct DNSKEY {
    pub flags: u16,
    pub protocol: u8, // MUST be 3
    pub algorithm: Algorithm,
    pub public_key: Vec<u8>,
}

impl DNSKEY {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let flags = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        let protocol = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let algorithm = Algorithm::from(rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?);
        if rdr.position() > end {
            return Err(CodecError::MalformedMessage.into());
        }
        let public_key = read_bytes(rdr, (end - rdr.position()) as usize)?;
        Ok(DNSKEY {
            flags,
            protocol,
            algorithm,
            public_key,
        })
    }

    pub fn is_zone_key(&self) -> bool {
        self.flags & FLAG_ZONE_KEY != 0
    }

    /// Secure Entry Point, conventionally the KSK.
    pub fn is_sep(&self) -> bool {
        self.flags & FLAG_SEP != 0
    }

    /// Key tag computation over the rdata, RFC4034 Appendix B.
    pub fn key_tag(&self) -> u16 {
        let mut wtr = MessageWriter::canonical();
        self.to_network_bytes(&mut wtr).unwrap();
        let rdata = wtr.into_bytes();

        let mut acc = 0u32;
        for (i, byte) in rdata.iter().enumerate() {
            if i & 1 == 0 {
                acc += (*byte as u32) << 8;
            } else {
                acc += *byte as u32;
            }
        }
        acc += (acc >> 16) & 0xFFFF;
        (acc & 0xFFFF) as u16
    }
}

impl ToNetworkOrder for DNSKEY {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u16(self.flags)?;
        wtr.write_u8(self.protocol)?;
        wtr.write_u8(self.algorithm.code())?;
        wtr.write_all(&self.public_key);
        Ok(4 + self.public_key.len())
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.flags,
            self.protocol,
            self.algorithm.code(),
            BASE64.encode(&self.public_key)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let key = DNSKEY {
            flags: 257,
            protocol: 3,
            algorithm: Algorithm::ED25519,
            public_key: vec![0u8; 32],
        };
        assert!(key.is_zone_key());
        assert!(key.is_sep());

        let key = DNSKEY { flags: 256, ..key };
        assert!(key.is_zone_key());
        assert!(!key.is_sep());
    }

    #[test]
    fn key_tag_is_stable() {
        let key = DNSKEY {
            flags: 256,
            protocol: 3,
            algorithm: Algorithm::RSASHA256,
            public_key: vec![0x03, 0x01, 0x00, 0x01, 0xAB, 0xCD],
        };
        // computed twice gives the same tag
        assert_eq!(key.key_tag(), key.key_tag());
    }
}
