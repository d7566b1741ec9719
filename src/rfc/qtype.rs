//! RR type codes: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
//!
//! Only the types the resolver handles structurally get a variant; everything
//! else is carried as `Unknown` so the code value survives byte-identical.
use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::CodecError;
use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum QType {
    #[default]
    A, // a host address	[RFC1035]
    NS,         // an authoritative name server	[RFC1035]
    CNAME,      // the canonical name for an alias	[RFC1035]
    SOA,        // marks the start of a zone of authority	[RFC1035]
    PTR,        // a domain name pointer	[RFC1035]
    HINFO,      // host information	[RFC1035]
    MX,         // mail exchange	[RFC1035]
    TXT,        // text strings	[RFC1035]
    AAAA,       // IP6 Address	[RFC3596]
    SRV,        // Server Selection	[RFC2782]
    NAPTR,      // Naming Authority Pointer	[RFC3403]
    DNAME,      // DNAME	[RFC6672]
    OPT,        // OPT pseudo-RR	[RFC6891]
    DS,         // Delegation Signer	[RFC4034]
    RRSIG,      // RRSIG	[RFC4034]
    NSEC,       // NSEC	[RFC4034][RFC9077]
    DNSKEY,     // DNSKEY	[RFC4034]
    NSEC3,      // NSEC3	[RFC5155][RFC9077]
    NSEC3PARAM, // NSEC3PARAM	[RFC5155]
    TLSA,       // TLSA	[RFC6698]
    SVCB,       // Service Binding	[RFC9460]
    HTTPS,      // HTTPS Binding	[RFC9460]
    CAA,        // Certification Authority Restriction	[RFC8659]
    // anything else is kept verbatim, rdata opaque (RFC3597)
    Unknown(u16),
}

impl QType {
    pub fn code(&self) -> u16 {
        match self {
            QType::A => 1,
            QType::NS => 2,
            QType::CNAME => 5,
            QType::SOA => 6,
            QType::PTR => 12,
            QType::HINFO => 13,
            QType::MX => 15,
            QType::TXT => 16,
            QType::AAAA => 28,
            QType::SRV => 33,
            QType::NAPTR => 35,
            QType::DNAME => 39,
            QType::OPT => 41,
            QType::DS => 43,
            QType::RRSIG => 46,
            QType::NSEC => 47,
            QType::DNSKEY => 48,
            QType::NSEC3 => 50,
            QType::NSEC3PARAM => 51,
            QType::TLSA => 52,
            QType::SVCB => 64,
            QType::HTTPS => 65,
            QType::CAA => 257,
            QType::Unknown(code) => *code,
        }
    }
}

impl From<u16> for QType {
    fn from(code: u16) -> Self {
        match code {
            1 => QType::A,
            2 => QType::NS,
            5 => QType::CNAME,
            6 => QType::SOA,
            12 => QType::PTR,
            13 => QType::HINFO,
            15 => QType::MX,
            16 => QType::TXT,
            28 => QType::AAAA,
            33 => QType::SRV,
            35 => QType::NAPTR,
            39 => QType::DNAME,
            41 => QType::OPT,
            43 => QType::DS,
            46 => QType::RRSIG,
            47 => QType::NSEC,
            48 => QType::DNSKEY,
            50 => QType::NSEC3,
            51 => QType::NSEC3PARAM,
            52 => QType::TLSA,
            64 => QType::SVCB,
            65 => QType::HTTPS,
            257 => QType::CAA,
            _ => QType::Unknown(code),
        }
    }
}

/// ```
/// use recursor::rfc::qtype::QType;
///
/// assert_eq!("aaaa".parse::<QType>().unwrap(), QType::AAAA);
/// assert_eq!("TYPE999".parse::<QType>().unwrap(), QType::Unknown(999));
/// assert!("no-such-type".parse::<QType>().is_err());
/// ```
impl FromStr for QType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        let qtype = match upper.as_str() {
            "A" => QType::A,
            "NS" => QType::NS,
            "CNAME" => QType::CNAME,
            "SOA" => QType::SOA,
            "PTR" => QType::PTR,
            "HINFO" => QType::HINFO,
            "MX" => QType::MX,
            "TXT" => QType::TXT,
            "AAAA" => QType::AAAA,
            "SRV" => QType::SRV,
            "NAPTR" => QType::NAPTR,
            "DNAME" => QType::DNAME,
            "OPT" => QType::OPT,
            "DS" => QType::DS,
            "RRSIG" => QType::RRSIG,
            "NSEC" => QType::NSEC,
            "DNSKEY" => QType::DNSKEY,
            "NSEC3" => QType::NSEC3,
            "NSEC3PARAM" => QType::NSEC3PARAM,
            "TLSA" => QType::TLSA,
            "SVCB" => QType::SVCB,
            "HTTPS" => QType::HTTPS,
            "CAA" => QType::CAA,
            // the RFC3597 TYPEnnn notation
            _ => {
                let code = upper
                    .strip_prefix("TYPE")
                    .and_then(|n| n.parse::<u16>().ok())
                    .ok_or_else(|| format!("error converting string '{}' to a query type", s))?;
                QType::from(code)
            }
        };
        Ok(qtype)
    }
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QType::Unknown(code) => write!(f, "TYPE{}", code),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl ToNetworkOrder for QType {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        wtr.write_u16(self.code())?;
        Ok(2)
    }
}

impl FromNetworkOrder for QType {
    fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
        let code = rdr
            .read_u16::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;
        *self = QType::from(code);
        Ok(())
    }
}
