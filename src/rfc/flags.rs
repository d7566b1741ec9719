//! Header flags: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
//! with the AD/CD bits of RFC4035 §3.1.6 carved out of the old Z field.
use std::fmt;

use byteorder::{BigEndian, ReadBytesExt};

use dns_derive::DnsEnum;

use crate::error::{CodecError, DNSResult};
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::opcode::OpCode;
use crate::rfc::response_code::ResponseCode;

/// The flags' first bit is 0 or 1 meaning a query or a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
#[repr(u8)]
pub enum PacketType {
    Query = 0,
    Response = 1,
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PacketType::Query => write!(f, "QUERY"),
            PacketType::Response => write!(f, "RESPONSE"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub packet_type: PacketType, // QR: query (0) or response (1)
    pub op_code: OpCode,
    pub authoritative_answer: bool, // AA: valid in responses only
    pub truncated: bool,            // TC: message was cut to fit the channel
    pub recursion_desired: bool,    // RD: copied into the response
    pub recursion_available: bool,  // RA
    pub z: bool,                    // reserved, must be zero
    pub authentic_data: bool,       // AD: set by a validating resolver
    pub checking_disabled: bool,    // CD: the requester accepts unvalidated data
    pub response_code: ResponseCode,
}

impl ToNetworkOrder for Flags {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        // combine all flags according to structure
        //                               1  1  1  1  1  1
        // 0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
        // +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
        // |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
        // +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
        let mut flags = (self.packet_type as u16) << 15;
        flags |= (self.op_code as u16) << 11;
        flags |= (self.authoritative_answer as u16) << 10;
        flags |= (self.truncated as u16) << 9;
        flags |= (self.recursion_desired as u16) << 8;
        flags |= (self.recursion_available as u16) << 7;
        flags |= (self.z as u16) << 6;
        flags |= (self.authentic_data as u16) << 5;
        flags |= (self.checking_disabled as u16) << 4;
        // only the low 4 bits fit here, the extension lives in OPT
        flags |= self.response_code as u16 & 0b1111;

        wtr.write_u16(flags)?;
        Ok(2)
    }
}

impl FromNetworkOrder for Flags {
    fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
        let flags = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;

        self.packet_type =
            PacketType::try_from(flags >> 15).map_err(|_| CodecError::MalformedMessage)?;
        self.op_code =
            OpCode::try_from(flags >> 11 & 0b1111).map_err(|_| CodecError::MalformedMessage)?;
        self.authoritative_answer = (flags >> 10) & 1 == 1;
        self.truncated = (flags >> 9) & 1 == 1;
        self.recursion_desired = (flags >> 8) & 1 == 1;
        self.recursion_available = (flags >> 7) & 1 == 1;
        self.z = (flags >> 6) & 1 == 1;
        self.authentic_data = (flags >> 5) & 1 == 1;
        self.checking_disabled = (flags >> 4) & 1 == 1;
        self.response_code =
            ResponseCode::try_from(flags & 0b1111).map_err(|_| CodecError::MalformedMessage)?;

        Ok(())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rcode:{}", self.packet_type, self.response_code)?;
        for (set, tag) in [
            (self.authoritative_answer, "AA"),
            (self.truncated, "TC"),
            (self.recursion_desired, "RD"),
            (self.recursion_available, "RA"),
            (self.authentic_data, "AD"),
            (self.checking_disabled, "CD"),
        ] {
            if set {
                write!(f, " {}", tag)?;
            }
        }
        Ok(())
    }
}
