//! One module per RR type the resolver understands structurally, plus the
//! opaque fallback of RFC3597 for everything else.
//!
//! Each type knows its rdata byte layout, whether its name fields take part
//! in compression, and a zone-file-like textual projection used by the
//! presentation layer.
use std::fmt;
use std::io::Cursor;

use data_encoding::HEXUPPER;

use crate::error::{CodecError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;
use crate::rfc::qtype::QType;

pub mod a;
pub mod aaaa;
pub mod algorithm;
pub mod caa;
pub mod dnskey;
pub mod ds;
pub mod hinfo;
pub mod mx;
pub mod naptr;
pub mod nsec;
pub mod nsec3;
pub mod rrsig;
pub mod soa;
pub mod srv;
pub mod svcb;
pub mod tlsa;
pub mod txt;

use a::A;
use aaaa::AAAA;
use caa::CAA;
use dnskey::DNSKEY;
use ds::DS;
use hinfo::HINFO;
use mx::MX;
use naptr::NAPTR;
use nsec::NSEC;
use nsec3::{NSEC3, NSEC3PARAM};
use rrsig::RRSIG;
use soa::SOA;
use srv::SRV;
use svcb::SVCB;
use tlsa::TLSA;
use txt::TXT;

// single-name rdata types share the layout, only the semantics differ
pub type NS = DomainName;
pub type CNAME = DomainName;
pub type PTR = DomainName;
pub type DNAME = DomainName;

#[derive(Debug, Clone, PartialEq)]
pub enum RData {
    A(A),
    AAAA(AAAA),
    NS(NS),
    CNAME(CNAME),
    PTR(PTR),
    DNAME(DNAME),
    SOA(SOA),
    MX(MX),
    TXT(TXT),
    HINFO(HINFO),
    NAPTR(NAPTR),
    SRV(SRV),
    CAA(CAA),
    TLSA(TLSA),
    SVCB(SVCB),
    HTTPS(SVCB),
    DS(DS),
    DNSKEY(DNSKEY),
    RRSIG(RRSIG),
    NSEC(NSEC),
    NSEC3(NSEC3),
    NSEC3PARAM(NSEC3PARAM),
    // rdata kept byte-identical (RFC3597)
    Unknown(Vec<u8>),
}

impl Default for RData {
    fn default() -> Self {
        RData::Unknown(Vec::new())
    }
}

/// RFC3597 §4: compression pointers may only appear in the rdata of the
/// well-known RFC1035 types.
pub fn compression_allowed(qtype: &QType) -> bool {
    matches!(
        qtype,
        QType::NS | QType::CNAME | QType::PTR | QType::SOA | QType::MX
    )
}

impl RData {
    /// Decode `rdlength` bytes of rdata for `qtype`. Exactness is enforced:
    /// rdata not consuming its declared length is a malformed message.
    pub fn from_wire(qtype: &QType, rdr: &mut Cursor<&[u8]>, rdlength: u16) -> DNSResult<RData> {
        let end = rdr.position() + rdlength as u64;

        fn name(rdr: &mut Cursor<&[u8]>) -> DNSResult<DomainName> {
            let mut dn = DomainName::default();
            dn.from_network_bytes(rdr)?;
            Ok(dn)
        }

        let rdata = match qtype {
            QType::A => {
                let mut a = A::default();
                a.from_network_bytes(rdr)?;
                RData::A(a)
            }
            QType::AAAA => {
                let mut aaaa = AAAA::default();
                aaaa.from_network_bytes(rdr)?;
                RData::AAAA(aaaa)
            }
            QType::NS => RData::NS(name(rdr)?),
            QType::CNAME => RData::CNAME(name(rdr)?),
            QType::PTR => RData::PTR(name(rdr)?),
            QType::DNAME => RData::DNAME(name(rdr)?),
            QType::SOA => {
                let mut soa = SOA::default();
                soa.from_network_bytes(rdr)?;
                RData::SOA(soa)
            }
            QType::MX => {
                let mut mx = MX::default();
                mx.from_network_bytes(rdr)?;
                RData::MX(mx)
            }
            QType::HINFO => {
                let mut hinfo = HINFO::default();
                hinfo.from_network_bytes(rdr)?;
                RData::HINFO(hinfo)
            }
            QType::NAPTR => {
                let mut naptr = NAPTR::default();
                naptr.from_network_bytes(rdr)?;
                RData::NAPTR(naptr)
            }
            QType::SRV => {
                let mut srv = SRV::default();
                srv.from_network_bytes(rdr)?;
                RData::SRV(srv)
            }
            QType::TXT => RData::TXT(TXT::from_wire(rdr, end)?),
            QType::CAA => RData::CAA(CAA::from_wire(rdr, end)?),
            QType::TLSA => RData::TLSA(TLSA::from_wire(rdr, end)?),
            QType::SVCB => RData::SVCB(SVCB::from_wire(rdr, end)?),
            QType::HTTPS => RData::HTTPS(SVCB::from_wire(rdr, end)?),
            QType::DS => RData::DS(DS::from_wire(rdr, end)?),
            QType::DNSKEY => RData::DNSKEY(DNSKEY::from_wire(rdr, end)?),
            QType::RRSIG => RData::RRSIG(RRSIG::from_wire(rdr, end)?),
            QType::NSEC => RData::NSEC(NSEC::from_wire(rdr, end)?),
            QType::NSEC3 => RData::NSEC3(NSEC3::from_wire(rdr, end)?),
            QType::NSEC3PARAM => RData::NSEC3PARAM(NSEC3PARAM::from_wire(rdr, end)?),
            _ => RData::Unknown(read_bytes(rdr, rdlength as usize)?),
        };

        if rdr.position() != end {
            return Err(CodecError::MalformedMessage.into());
        }
        Ok(rdata)
    }

    /// The canonical serialization of this rdata alone: uncompressed,
    /// designated names lowercased. This is the sort key of RRset
    /// canonicalization and the rdata part of the signed bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut wtr = MessageWriter::canonical();
        // writing to a plain Vec cannot fail
        self.to_network_bytes(&mut wtr).unwrap();
        wtr.into_bytes()
    }
}

impl ToNetworkOrder for RData {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        match self {
            RData::A(x) => x.to_network_bytes(wtr),
            RData::AAAA(x) => x.to_network_bytes(wtr),
            RData::NS(x) => x.to_network_bytes(wtr),
            RData::CNAME(x) => x.to_network_bytes(wtr),
            RData::PTR(x) => x.to_network_bytes(wtr),
            RData::DNAME(x) => x.to_network_bytes(wtr),
            RData::SOA(x) => x.to_network_bytes(wtr),
            RData::MX(x) => x.to_network_bytes(wtr),
            RData::TXT(x) => x.to_network_bytes(wtr),
            RData::HINFO(x) => x.to_network_bytes(wtr),
            RData::NAPTR(x) => x.to_network_bytes(wtr),
            RData::SRV(x) => x.to_network_bytes(wtr),
            RData::CAA(x) => x.to_network_bytes(wtr),
            RData::TLSA(x) => x.to_network_bytes(wtr),
            RData::SVCB(x) => x.to_network_bytes(wtr),
            RData::HTTPS(x) => x.to_network_bytes(wtr),
            RData::DS(x) => x.to_network_bytes(wtr),
            RData::DNSKEY(x) => x.to_network_bytes(wtr),
            RData::RRSIG(x) => x.to_network_bytes(wtr),
            RData::NSEC(x) => x.to_network_bytes(wtr),
            RData::NSEC3(x) => x.to_network_bytes(wtr),
            RData::NSEC3PARAM(x) => x.to_network_bytes(wtr),
            RData::Unknown(raw) => raw.to_network_bytes(wtr),
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(x) => write!(f, "{}", x),
            RData::AAAA(x) => write!(f, "{}", x),
            RData::NS(x) => write!(f, "{}", x),
            RData::CNAME(x) => write!(f, "{}", x),
            RData::PTR(x) => write!(f, "{}", x),
            RData::DNAME(x) => write!(f, "{}", x),
            RData::SOA(x) => write!(f, "{}", x),
            RData::MX(x) => write!(f, "{}", x),
            RData::TXT(x) => write!(f, "{}", x),
            RData::HINFO(x) => write!(f, "{}", x),
            RData::NAPTR(x) => write!(f, "{}", x),
            RData::SRV(x) => write!(f, "{}", x),
            RData::CAA(x) => write!(f, "{}", x),
            RData::TLSA(x) => write!(f, "{}", x),
            RData::SVCB(x) => write!(f, "{}", x),
            RData::HTTPS(x) => write!(f, "{}", x),
            RData::DS(x) => write!(f, "{}", x),
            RData::DNSKEY(x) => write!(f, "{}", x),
            RData::RRSIG(x) => write!(f, "{}", x),
            RData::NSEC(x) => write!(f, "{}", x),
            RData::NSEC3(x) => write!(f, "{}", x),
            RData::NSEC3PARAM(x) => write!(f, "{}", x),
            // the RFC3597 generic notation
            RData::Unknown(raw) => write!(f, "\\# {} {}", raw.len(), HEXUPPER.encode(raw)),
        }
    }
}
