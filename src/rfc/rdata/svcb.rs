//! SVCB and HTTPS RRs: https://datatracker.ietf.org/doc/html/rfc9460
//!
//! Service parameter values are kept as raw bytes so unknown keys round-trip
//! byte-identical; the presentation layer names the keys it knows.
use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use data_encoding::HEXLOWER;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SvcParam {
    pub key: u16,
    pub value: Vec<u8>,
}

impl SvcParam {
    fn key_name(&self) -> &'static str {
        match self.key {
            0 => "mandatory",
            1 => "alpn",
            2 => "no-default-alpn",
            3 => "port",
            4 => "ipv4hint",
            5 => "ech",
            6 => "ipv6hint",
            _ => "key",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SVCB {
    pub priority: u16, // 0 means AliasMode, anything else ServiceMode
    pub target: DomainName,
    pub params: Vec<SvcParam>,
}

impl SVCB {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let priority = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;

        let mut target = DomainName::default();
        target.from_network_bytes(rdr)?;

        let mut params = Vec::new();
        while rdr.position() < end {
            let key = rdr
                .read_u16::<BigEndian>()
                .map_err(|_| CodecError::MalformedMessage)?;
            let length = rdr
                .read_u16::<BigEndian>()
                .map_err(|_| CodecError::MalformedMessage)? as usize;
            let value = read_bytes(rdr, length)?;
            params.push(SvcParam { key, value });
        }

        Ok(SVCB {
            priority,
            target,
            params,
        })
    }
}

impl ToNetworkOrder for SVCB {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u16(self.priority)?;
        let mut length = 2 + self.target.to_network_bytes(wtr)?;
        for param in &self.params {
            wtr.write_u16(param.key)?;
            wtr.write_u16(param.value.len() as u16)?;
            wtr.write_all(&param.value);
            length += 4 + param.value.len();
        }
        Ok(length)
    }
}

impl fmt::Display for SVCB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.priority, self.target)?;
        for param in &self.params {
            if param.key > 6 {
                write!(f, " key{}={}", param.key, HEXLOWER.encode(&param.value))?;
            } else {
                write!(f, " {}={}", param.key_name(), HEXLOWER.encode(&param.value))?;
            }
        }
        Ok(())
    }
}
