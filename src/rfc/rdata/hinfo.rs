//! HINFO RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.2
use std::fmt;

use dns_derive::DnsStruct;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::char_string::CharacterString;

#[derive(Debug, Default, Clone, PartialEq, DnsStruct)]
pub struct HINFO {
    pub cpu: CharacterString,
    pub os: CharacterString,
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" \"{}\"", self.cpu, self.os)
    }
}
