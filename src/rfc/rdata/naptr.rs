//! NAPTR RR: https://datatracker.ietf.org/doc/html/rfc3403#section-4.1
use std::fmt;

use dns_derive::DnsStruct;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::char_string::CharacterString;
use crate::rfc::domain::DomainName;

#[derive(Debug, Default, Clone, PartialEq, DnsStruct)]
pub struct NAPTR {
    pub order: u16,      // processed in order of increasing value
    pub preference: u16, // among records with equal order
    pub flags: CharacterString,
    pub services: CharacterString,
    pub regexp: CharacterString,
    pub replacement: DomainName, // never compressed on the wire
}

impl fmt::Display for NAPTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\" \"{}\" \"{}\" {}",
            self.order, self.preference, self.flags, self.services, self.regexp, self.replacement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let naptr = NAPTR {
            order: 100,
            preference: 10,
            flags: CharacterString::from("U"),
            services: CharacterString::from("SIP+D2U"),
            regexp: CharacterString::from("!^.*$!sip:info@example.com!"),
            replacement: "example.com".parse().unwrap(),
        };

        let mut wtr = MessageWriter::new();
        // rdata names of NAPTR never compress
        wtr.set_rdata_compression(false);
        naptr.to_network_bytes(&mut wtr).unwrap();

        let raw = wtr.into_bytes();
        let mut rdr = std::io::Cursor::new(raw.as_slice());
        let mut back = NAPTR::default();
        back.from_network_bytes(&mut rdr).unwrap();
        assert_eq!(back, naptr);

        // canonical bytes match the wire bytes for an already-lowercase record
        use crate::rfc::rdata::RData;
        assert_eq!(RData::NAPTR(naptr).canonical_bytes(), raw);
    }
}
