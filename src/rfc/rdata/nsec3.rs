//! NSEC3 and NSEC3PARAM RRs: https://datatracker.ietf.org/doc/html/rfc5155
use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use data_encoding::{BASE32HEX_NOPAD, HEXLOWER};

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{MessageWriter, ToNetworkOrder};
use crate::rfc::rdata::nsec::TypeBitmap;

// the only hash algorithm assigned (SHA-1)
pub const NSEC3_HASH_SHA1: u8 = 1;
// opt-out flag: unsigned delegations may exist between owner and next
pub const NSEC3_FLAG_OPT_OUT: u8 = 0x01;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NSEC3 {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed: Vec<u8>, // hash of the next owner in hash order
    pub types: TypeBitmap,
}

impl NSEC3 {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let hash_algorithm = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let flags = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let iterations = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;

        let salt_length = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)? as usize;
        let salt = read_bytes(rdr, salt_length)?;

        let hash_length = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)? as usize;
        let next_hashed = read_bytes(rdr, hash_length)?;

        let types = TypeBitmap::read(rdr, end)?;

        Ok(NSEC3 {
            hash_algorithm,
            flags,
            iterations,
            salt,
            next_hashed,
            types,
        })
    }

    pub fn opt_out(&self) -> bool {
        self.flags & NSEC3_FLAG_OPT_OUT != 0
    }
}

impl ToNetworkOrder for NSEC3 {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u8(self.hash_algorithm)?;
        wtr.write_u8(self.flags)?;
        wtr.write_u16(self.iterations)?;
        wtr.write_u8(self.salt.len() as u8)?;
        wtr.write_all(&self.salt);
        wtr.write_u8(self.next_hashed.len() as u8)?;
        wtr.write_all(&self.next_hashed);

        let mut length = 6 + self.salt.len() + self.next_hashed.len();
        length += self.types.write(wtr)?;
        Ok(length)
    }
}

impl fmt::Display for NSEC3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let salt = if self.salt.is_empty() {
            "-".to_string()
        } else {
            HEXLOWER.encode(&self.salt)
        };
        write!(
            f,
            "{} {} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            salt,
            BASE32HEX_NOPAD.encode(&self.next_hashed)
        )?;
        for qtype in self.types.types() {
            write!(f, " {}", qtype)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NSEC3PARAM {
    pub hash_algorithm: u8,
    pub flags: u8, // always zero here, flags only matter in NSEC3
    pub iterations: u16,
    pub salt: Vec<u8>,
}

impl NSEC3PARAM {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let hash_algorithm = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let flags = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let iterations = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;

        let salt_length = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)? as usize;
        let salt = read_bytes(rdr, salt_length)?;

        if rdr.position() != end {
            return Err(CodecError::MalformedMessage.into());
        }

        Ok(NSEC3PARAM {
            hash_algorithm,
            flags,
            iterations,
            salt,
        })
    }
}

impl ToNetworkOrder for NSEC3PARAM {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u8(self.hash_algorithm)?;
        wtr.write_u8(self.flags)?;
        wtr.write_u16(self.iterations)?;
        wtr.write_u8(self.salt.len() as u8)?;
        wtr.write_all(&self.salt);
        Ok(5 + self.salt.len())
    }
}

impl fmt::Display for NSEC3PARAM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let salt = if self.salt.is_empty() {
            "-".to_string()
        } else {
            HEXLOWER.encode(&self.salt)
        };
        write!(
            f,
            "{} {} {} {}",
            self.hash_algorithm, self.flags, self.iterations, salt
        )
    }
}
