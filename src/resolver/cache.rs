//! The cache contract. The resolver works with or without one: a failing or
//! absent cache only costs queries, never correctness. Implementations must
//! provide at-most-once population per (name, type); the usual discipline is
//! an internal single-flight map keyed by the query fingerprint.
use std::io::Cursor;

use async_trait::async_trait;
use byteorder::{BigEndian, ReadBytesExt};

use crate::dnssec::TrustState;
use crate::error::{CodecError, DNSResult};
use crate::framing;
use crate::network_order::primitive::read_bytes;
use crate::network_order::{MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;
use crate::rfc::qtype::QType;
use crate::rfc::rdata::RData;
use crate::rfc::resource_record::ResourceRecord;
use crate::rfc::rrset::RRSet;

#[derive(Debug, Clone)]
pub struct CachedRRSet {
    pub rrset: RRSet,
    pub ttl_remaining: u32,
    pub state: TrustState,
}

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, name: &DomainName, qtype: QType) -> Option<CachedRRSet>;
    async fn put(&self, rrset: RRSet, state: TrustState);
}

/// The null cache: remembers nothing.
pub struct NullCache;

#[async_trait]
impl Cache for NullCache {
    async fn get(&self, _name: &DomainName, _qtype: QType) -> Option<CachedRRSet> {
        None
    }

    async fn put(&self, _rrset: RRSet, _state: TrustState) {}
}

// ---- snapshot persistence for cache implementations ----
//
// One record: owner string | state byte | stored-at timestamp |
// record count | per record: type code, ttl, length-prefixed rdata.

pub fn write_snapshot_entry(
    buf: &mut Vec<u8>,
    rrset: &RRSet,
    state: TrustState,
    stored_at_ms: u64,
) -> DNSResult<()> {
    framing::write_string(buf, &rrset.name().to_string())?;
    buf.push(state.code());
    framing::write_timestamp(buf, stored_at_ms)?;
    framing::write_length(buf, rrset.len())?;

    for rr in rrset.records() {
        buf.extend_from_slice(&rr.r#type.code().to_be_bytes());
        buf.extend_from_slice(&rr.ttl.to_be_bytes());

        let mut wtr = MessageWriter::uncompressed();
        rr.rdata.to_network_bytes(&mut wtr)?;
        let rdata = wtr.into_bytes();
        framing::write_length(buf, rdata.len())?;
        buf.extend_from_slice(&rdata);
    }
    Ok(())
}

pub fn read_snapshot_entry(rdr: &mut Cursor<&[u8]>) -> DNSResult<(RRSet, TrustState, u64)> {
    let name: DomainName = framing::read_string(rdr)?.as_str().try_into()?;
    let state = TrustState::from_code(rdr.read_u8().map_err(|_| CodecError::MalformedMessage)?)
        .ok_or(CodecError::MalformedMessage)?;
    let stored_at = framing::read_timestamp(rdr)?;
    let count = framing::read_length(rdr)?;

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let qtype = QType::from(
            rdr.read_u16::<BigEndian>()
                .map_err(|_| CodecError::MalformedMessage)?,
        );
        let ttl = rdr
            .read_u32::<BigEndian>()
            .map_err(|_| CodecError::MalformedMessage)?;

        let length = framing::read_length(rdr)?;
        let raw = read_bytes(rdr, length)?;
        let mut inner = Cursor::new(raw.as_slice());
        let rdata = RData::from_wire(&qtype, &mut inner, length as u16)?;

        records.push(ResourceRecord::new(name.clone(), qtype, ttl, rdata));
    }

    let rrset = RRSet::from_records(records).ok_or(CodecError::MalformedMessage)?;
    Ok((rrset, state, stored_at))
}
