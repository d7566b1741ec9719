//! A RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.4.1
use std::fmt;
use std::net::Ipv4Addr;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct A(pub Ipv4Addr);

impl Default for A {
    fn default() -> Self {
        A(Ipv4Addr::UNSPECIFIED)
    }
}

impl ToNetworkOrder for A {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        self.0.octets().to_network_bytes(wtr)
    }
}

impl FromNetworkOrder for A {
    fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
        let mut octets = [0u8; 4];
        octets.from_network_bytes(rdr)?;
        self.0 = Ipv4Addr::from(octets);
        Ok(())
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
