//! OPT pseudo-RR, EDNS(0): https://datatracker.ietf.org/doc/html/rfc6891
//!
//! OPT never surfaces as an ordinary record: the message codec synthesizes it
//! on encode and absorbs it on decode into [`Edns`].
//!
//! RR format:
//! +------------+--------------+------------------------------+
//! | Field Name | Field Type   | Description                  |
//! +------------+--------------+------------------------------+
//! | NAME       | domain name  | MUST be 0 (root domain)      |
//! | TYPE       | u_int16_t    | OPT (41)                     |
//! | CLASS      | u_int16_t    | requestor's UDP payload size |
//! | TTL        | u_int32_t    | extended RCODE and flags     |
//! | RDLEN      | u_int16_t    | length of all RDATA          |
//! | RDATA      | octet stream | {attribute,value} pairs      |
//! +------------+--------------+------------------------------+
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::MessageWriter;
use crate::rfc::qtype::QType;

/// EDNS payload sizes below this are treated as 512 (RFC6891 §6.2.3).
pub const MIN_UDP_PAYLOAD_SIZE: u16 = 512;
pub const DEFAULT_UDP_PAYLOAD_SIZE: u16 = 1232;

const DO_BIT: u16 = 0x8000;
const ECS_OPTION_CODE: u16 = 8;

/// EDNS Client Subnet, RFC7871.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientSubnet {
    pub family: u16, // 1 = IPv4, 2 = IPv6
    pub source_prefix: u8,
    pub scope_prefix: u8,
    pub address: Vec<u8>, // truncated to the source prefix
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdnsOption {
    ClientSubnet(ClientSubnet),
    // unknown options are preserved byte-identical
    Other { code: u16, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edns {
    pub udp_payload_size: u16,
    pub extended_rcode: u8, // upper 8 bits of the 12-bit RCODE
    pub version: u8,
    pub dnssec_ok: bool, // the DO bit
    pub z: u16,          // remaining 15 flag bits, must be zero
    pub options: Vec<EdnsOption>,
}

impl Default for Edns {
    fn default() -> Self {
        Self {
            udp_payload_size: DEFAULT_UDP_PAYLOAD_SIZE,
            extended_rcode: 0,
            version: 0,
            dnssec_ok: false,
            z: 0,
            options: Vec::new(),
        }
    }
}

impl Edns {
    pub fn new(udp_payload_size: u16, dnssec_ok: bool) -> Self {
        Self {
            udp_payload_size: udp_payload_size.max(MIN_UDP_PAYLOAD_SIZE),
            dnssec_ok,
            ..Default::default()
        }
    }

    /// Synthesize the OPT pseudo-RR. `extended_rcode` carries the upper bits
    /// of the message's RCODE, supplied by the message encoder.
    pub fn write_opt_rr(&self, wtr: &mut MessageWriter, extended_rcode: u8) -> std::io::Result<usize> {
        // root owner name
        wtr.write_u8(0)?;
        wtr.write_u16(QType::OPT.code())?;
        wtr.write_u16(self.udp_payload_size.max(MIN_UDP_PAYLOAD_SIZE))?;

        // TTL field: extended RCODE | version | DO + Z
        let mut flags = self.z & !DO_BIT;
        if self.dnssec_ok {
            flags |= DO_BIT;
        }
        let ttl =
            (extended_rcode as u32) << 24 | (self.version as u32) << 16 | flags as u32;
        wtr.write_u32(ttl)?;

        // rdlength back-filled once the options are out
        let rdlength_offset = wtr.position();
        wtr.write_u16(0)?;

        let mut rdlength = 0usize;
        for option in &self.options {
            rdlength += match option {
                EdnsOption::ClientSubnet(ecs) => {
                    wtr.write_u16(ECS_OPTION_CODE)?;
                    wtr.write_u16(4 + ecs.address.len() as u16)?;
                    wtr.write_u16(ecs.family)?;
                    wtr.write_u8(ecs.source_prefix)?;
                    wtr.write_u8(ecs.scope_prefix)?;
                    wtr.write_all(&ecs.address);
                    8 + ecs.address.len()
                }
                EdnsOption::Other { code, data } => {
                    wtr.write_u16(*code)?;
                    wtr.write_u16(data.len() as u16)?;
                    wtr.write_all(data);
                    4 + data.len()
                }
            };
        }
        wtr.patch_u16(rdlength_offset, rdlength as u16);

        Ok(11 + rdlength)
    }

    /// Absorb an OPT record whose owner name and type have already been
    /// consumed by the section reader.
    pub fn read_opt_rr(rdr: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let udp_payload_size = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?
            .max(MIN_UDP_PAYLOAD_SIZE);

        let ttl = rdr
            .read_u32::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        let extended_rcode = (ttl >> 24) as u8;
        let version = (ttl >> 16) as u8;
        let flags = ttl as u16;

        let rdlength = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)? as u64;
        let end = rdr.position() + rdlength;

        let mut options = Vec::new();
        while rdr.position() < end {
            let code = rdr
                .read_u16::<BigEndian>()
                .map_err(|_| CodecError::MalformedMessage)?;
            let length = rdr
                .read_u16::<BigEndian>()
                .map_err(|_| CodecError::MalformedMessage)? as usize;

            match code {
                ECS_OPTION_CODE if length >= 4 => {
                    let family = rdr
                        .read_u16::<BigEndian>()
                        .map_err(|_| CodecError::MalformedMessage)?;
                    let source_prefix = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
                    let scope_prefix = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
                    let address = read_bytes(rdr, length - 4)?;
                    options.push(EdnsOption::ClientSubnet(ClientSubnet {
                        family,
                        source_prefix,
                        scope_prefix,
                        address,
                    }));
                }
                _ => {
                    let data = read_bytes(rdr, length)?;
                    options.push(EdnsOption::Other { code, data });
                }
            }
        }

        if rdr.position() != end {
            return Err(CodecError::MalformedMessage.into());
        }

        Ok(Edns {
            udp_payload_size,
            extended_rcode,
            version,
            dnssec_ok: flags & DO_BIT != 0,
            z: flags & !DO_BIT,
            options,
        })
    }
}
