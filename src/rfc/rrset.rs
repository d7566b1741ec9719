//! RRsets: all records sharing (owner, type, class), signed as a unit.
//!
//! The canonical serialization (RFC4034 §3.1.8.1) feeds signature
//! computation: owner in canonical form, records sorted by canonical rdata,
//! TTL replaced by the RRSIG's original TTL, no compression anywhere.
use std::collections::HashMap;

use crate::rfc::domain::DomainName;
use crate::rfc::qclass::QClass;
use crate::rfc::qtype::QType;
use crate::rfc::rdata::rrsig::RRSIG;
use crate::rfc::resource_record::ResourceRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct RRSet {
    records: Vec<ResourceRecord>,
}

impl RRSet {
    /// Group a section into RRsets, preserving first-seen order. RRSIG
    /// records form their own sets like any other type.
    pub fn group(records: &[ResourceRecord]) -> Vec<RRSet> {
        let mut order = Vec::new();
        let mut sets: HashMap<(DomainName, u16), Vec<ResourceRecord>> = HashMap::new();

        for rr in records {
            let key = (rr.name.clone(), rr.r#type.code());
            if !sets.contains_key(&key) {
                order.push(key.clone());
            }
            sets.entry(key).or_default().push(rr.clone());
        }

        order
            .into_iter()
            .map(|key| RRSet {
                records: sets.remove(&key).unwrap(),
            })
            .collect()
    }

    pub fn from_records(records: Vec<ResourceRecord>) -> Option<RRSet> {
        let first = records.first()?;
        let (name, qtype) = (first.name.clone(), first.r#type);
        if records
            .iter()
            .any(|rr| rr.name != name || rr.r#type != qtype)
        {
            return None;
        }
        Some(RRSet { records })
    }

    pub fn name(&self) -> &DomainName {
        &self.records[0].name
    }

    pub fn qtype(&self) -> QType {
        self.records[0].r#type
    }

    pub fn class(&self) -> QClass {
        self.records[0].class
    }

    pub fn ttl(&self) -> u32 {
        self.records.iter().map(|rr| rr.ttl).min().unwrap_or(0)
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ResourceRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The byte string covered by a signature over this set: the RRSIG rdata
    /// prefix, then each record as
    /// `owner | type | class | original TTL | rdlength | canonical rdata`,
    /// sorted ascending by canonical rdata, duplicates dropped.
    pub fn signed_bytes(&self, rrsig: &RRSIG) -> Vec<u8> {
        let mut signed = rrsig.signed_prefix();

        // RFC4035 §5.3.2: the RRset is reconstituted with the owner the
        // signature was produced over; wildcard expansions shrink back to
        // the wildcard owner named by the label count.
        let owner = if (rrsig.labels as usize) < self.name().label_count() {
            let mut labels = vec!["*".to_string()];
            labels.extend(
                self.name()
                    .suffix(rrsig.labels as usize)
                    .labels()
                    .iter()
                    .cloned(),
            );
            DomainName::from_labels(labels).unwrap_or_else(|_| self.name().clone())
        } else {
            self.name().clone()
        };
        let owner_bytes = owner.canonical_bytes();

        let mut rdatas: Vec<Vec<u8>> = self
            .records
            .iter()
            .map(|rr| rr.rdata.canonical_bytes())
            .collect();
        rdatas.sort();
        rdatas.dedup();

        for rdata in rdatas {
            signed.extend_from_slice(&owner_bytes);
            signed.extend_from_slice(&self.qtype().code().to_be_bytes());
            signed.extend_from_slice(&(self.class() as u16).to_be_bytes());
            signed.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
            signed.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            signed.extend_from_slice(&rdata);
        }

        signed
    }
}
