//! RRSIG RR: https://datatracker.ietf.org/doc/html/rfc4034#section-3
use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use data_encoding::BASE64;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;
use crate::rfc::qtype::QType;
use crate::rfc::rdata::algorithm::Algorithm;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RRSIG {
    pub type_covered: QType,
    pub algorithm: Algorithm,
    /// Label count of the owner, without root and without a leading `*`.
    /// Fewer labels than the owner name means wildcard synthesis.
    pub labels: u8,
    pub original_ttl: u32,
    // 32-bit seconds since the epoch, serial-number arithmetic territory
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: DomainName, // the apex of the zone holding the signed RRset
    pub signature: Vec<u8>,
}

impl RRSIG {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let type_covered = QType::from(
            rdr.read_u16::<BigEndian>()
                .map_err(|_| CodecError::MalformedMessage)?,
        );
        let algorithm = Algorithm::from(rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?);
        let labels = rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?;
        let original_ttl = rdr
            .read_u32::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        let expiration = rdr
            .read_u32::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        let inception = rdr
            .read_u32::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        let key_tag = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;

        let mut signer_name = DomainName::default();
        signer_name.from_network_bytes(rdr)?;

        if rdr.position() > end {
            return Err(CodecError::MalformedMessage.into());
        }
        let signature = read_bytes(rdr, (end - rdr.position()) as usize)?;

        Ok(RRSIG {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
            signature,
        })
    }

    /// The rdata prefix covered by the signature: everything up to and
    /// including the signer name, canonical form. The first input block of
    /// signature computation and verification (RFC4034 §3.1.8.1).
    pub fn signed_prefix(&self) -> Vec<u8> {
        let mut wtr = MessageWriter::canonical();
        self.write_prefix(&mut wtr).unwrap();
        wtr.into_bytes()
    }

    fn write_prefix(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u16(self.type_covered.code())?;
        wtr.write_u8(self.algorithm.code())?;
        wtr.write_u8(self.labels)?;
        wtr.write_u32(self.original_ttl)?;
        wtr.write_u32(self.expiration)?;
        wtr.write_u32(self.inception)?;
        wtr.write_u16(self.key_tag)?;
        let length = self.signer_name.to_network_bytes(wtr)?;
        Ok(18 + length)
    }
}

impl ToNetworkOrder for RRSIG {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        // the signer name is never compressed, in any mode
        wtr.set_rdata_compression(false);
        let length = self.write_prefix(wtr)?;
        wtr.write_all(&self.signature);
        Ok(length + self.signature.len())
    }
}

impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            self.algorithm.code(),
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer_name,
            BASE64.encode(&self.signature)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RRSIG {
        RRSIG {
            type_covered: QType::A,
            algorithm: Algorithm::ED25519,
            labels: 2,
            original_ttl: 3600,
            expiration: 1893456000,
            inception: 1577836800,
            key_tag: 12345,
            signer_name: "example.com".parse().unwrap(),
            signature: vec![0xAB; 64],
        }
    }

    #[test]
    fn roundtrip() {
        let rrsig = sample();

        let mut wtr = MessageWriter::new();
        let length = rrsig.to_network_bytes(&mut wtr).unwrap();

        let raw = wtr.into_bytes();
        assert_eq!(length, raw.len());

        let mut rdr = Cursor::new(raw.as_slice());
        let back = RRSIG::from_wire(&mut rdr, raw.len() as u64).unwrap();
        assert_eq!(back, rrsig);
    }

    #[test]
    fn prefix_stops_before_signature() {
        let rrsig = sample();
        let prefix = rrsig.signed_prefix();
        // 18 fixed bytes + encoded signer name
        assert_eq!(prefix.len(), 18 + 13);
    }
}
