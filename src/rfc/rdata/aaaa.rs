//! AAAA RR: https://datatracker.ietf.org/doc/html/rfc3596
use std::fmt;
use std::net::Ipv6Addr;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AAAA(pub Ipv6Addr);

impl Default for AAAA {
    fn default() -> Self {
        AAAA(Ipv6Addr::UNSPECIFIED)
    }
}

impl ToNetworkOrder for AAAA {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        self.0.octets().to_network_bytes(wtr)
    }
}

impl FromNetworkOrder for AAAA {
    fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
        let mut octets = [0u8; 16];
        octets.from_network_bytes(rdr)?;
        self.0 = Ipv6Addr::from(octets);
        Ok(())
    }
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let aaaa = AAAA("2001:db8::7".parse().unwrap());

        let mut wtr = MessageWriter::new();
        assert_eq!(aaaa.to_network_bytes(&mut wtr).unwrap(), 16);

        let raw = wtr.into_bytes();
        let mut rdr = std::io::Cursor::new(raw.as_slice());
        let mut back = AAAA::default();
        back.from_network_bytes(&mut rdr).unwrap();
        assert_eq!(back, aaaa);
    }
}
