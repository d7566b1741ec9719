//! TLSA RR: https://datatracker.ietf.org/doc/html/rfc6698
use std::fmt;
use std::io::Cursor;

use byteorder::ReadBytesExt;

use data_encoding::HEXLOWER;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{MessageWriter, ToNetworkOrder};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TLSA {
    pub usage: u8,         // certificate usage
    pub selector: u8,      // full certificate (0) or SubjectPublicKeyInfo (1)
    pub matching_type: u8, // exact (0), SHA-256 (1), SHA-512 (2)
    pub cert_data: Vec<u8>,
}

impl TLSA {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let usage = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let selector = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let matching_type = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        if rdr.position() > end {
            return Err(CodecError::MalformedMessage.into());
        }
        let cert_data = read_bytes(rdr, (end - rdr.position()) as usize)?;
        Ok(TLSA {
            usage,
            selector,
            matching_type,
            cert_data,
        })
    }
}

impl ToNetworkOrder for TLSA {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u8(self.usage)?;
        wtr.write_u8(self.selector)?;
        wtr.write_u8(self.matching_type)?;
        wtr.write_all(&self.cert_data);
        Ok(3 + self.cert_data.len())
    }
}

impl fmt::Display for TLSA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.usage,
            self.selector,
            self.matching_type,
            HEXLOWER.encode(&self.cert_data)
        )
    }
}
