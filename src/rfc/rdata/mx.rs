//! MX RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.9
use std::fmt;

use dns_derive::DnsStruct;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;

#[derive(Debug, Default, Clone, PartialEq, DnsStruct)]
pub struct MX {
    pub preference: u16, // lower values are preferred
    pub exchange: DomainName, // host willing to act as a mail exchange for the owner name
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}
