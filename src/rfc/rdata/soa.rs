//! SOA RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.13
use std::fmt;

use dns_derive::DnsStruct;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;

#[derive(Debug, Default, Clone, PartialEq, DnsStruct)]
pub struct SOA {
    pub mname: DomainName, // primary source of data for this zone
    pub rname: DomainName, // mailbox of the person responsible for this zone
    pub serial: u32,       // version number of the original copy of the zone
    pub refresh: u32,      // interval before the zone should be refreshed
    pub retry: u32,        // interval before a failed refresh should be retried
    pub expire: u32,       // upper limit before the zone is no longer authoritative
    pub minimum: u32,      // minimum TTL for any RR exported from this zone
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire, self.minimum
        )
    }
}
