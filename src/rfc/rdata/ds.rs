//! DS RR: https://datatracker.ietf.org/doc/html/rfc4034#section-5
use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use data_encoding::HEXUPPER;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{MessageWriter, ToNetworkOrder};
use crate::rfc::rdata::algorithm::{Algorithm, DigestType};

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct DS {
    pub key_tag: u16,
    pub algorithm: Algorithm,
    pub digest_type: DigestType,
    pub digest: Vec<u8>, // digest over canonical owner name + DNSKEY rdata
}

impl DS {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let key_tag = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        let algorithm = Algorithm::from(rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?);
        let digest_type =
            DigestType::from(rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?);
        if rdr.position() > end {
            return Err(CodecError::MalformedMessage.into());
        }
        let digest = read_bytes(rdr, (end - rdr.position()) as usize)?;
        Ok(DS {
            key_tag,
            algorithm,
            digest_type,
            digest,
        })
    }
}

impl ToNetworkOrder for DS {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u16(self.key_tag)?;
        wtr.write_u8(self.algorithm.code())?;
        wtr.write_u8(self.digest_type.code())?;
        wtr.write_all(&self.digest);
        Ok(4 + self.digest.len())
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm.code(),
            self.digest_type.code(),
            HEXUPPER.encode(&self.digest)
        )
    }
}
