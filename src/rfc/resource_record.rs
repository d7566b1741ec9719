//! Resource record format: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.3
//!
//! ```text
//!                                     1  1  1  1  1  1
//!       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                      NAME                     |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                      TYPE                     |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                     CLASS                     |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                      TTL                      |
//!     |                                               |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                   RDLENGTH                    |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
//!     /                     RDATA                     /
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```
use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{CodecError, DNSResult};
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;
use crate::rfc::qclass::QClass;
use crate::rfc::qtype::QType;
use crate::rfc::rdata::{self, RData};

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    pub name: DomainName, // owner name, the node to which this record pertains
    pub r#type: QType,
    pub class: QClass,
    pub ttl: u32, // zero means: usable for the transaction in progress only
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn new(name: DomainName, r#type: QType, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            r#type,
            class: QClass::IN,
            ttl,
            rdata,
        }
    }

    /// Decode one record. The caller has already consumed the owner name and
    /// the type in order to divert OPT to the EDNS reader.
    pub fn read_tail(
        name: DomainName,
        r#type: QType,
        rdr: &mut Cursor<&[u8]>,
    ) -> DNSResult<Self> {
        let mut class = QClass::IN;
        class.from_network_bytes(rdr)?;

        let ttl = rdr
            .read_u32::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        let rdlength = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;

        let rdata = RData::from_wire(&r#type, rdr, rdlength)?;

        Ok(ResourceRecord {
            name,
            r#type,
            class,
            ttl,
            rdata,
        })
    }
}

impl ToNetworkOrder for ResourceRecord {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        let mut length = self.name.to_network_bytes(wtr)?;
        wtr.write_u16(self.r#type.code())?;
        wtr.write_u16(self.class as u16)?;
        wtr.write_u32(self.ttl)?;

        // rdlength is back-filled once the rdata is out
        let rdlength_offset = wtr.position();
        wtr.write_u16(0)?;

        // only the RFC1035 well-known types may compress inside rdata
        wtr.set_rdata_compression(rdata::compression_allowed(&self.r#type));
        let rdlength = self.rdata.to_network_bytes(wtr)?;
        wtr.set_rdata_compression(true);

        wtr.patch_u16(rdlength_offset, rdlength as u16);

        Ok(length + 10 + rdlength)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.name, self.ttl, self.class, self.r#type, self.rdata
        )
    }
}
