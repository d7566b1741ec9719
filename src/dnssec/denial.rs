//! Authenticated denial of existence: NSEC (RFC4034/4035) and NSEC3
//! (RFC5155) proofs. The validator calls these with records whose signatures
//! it has already verified.
use data_encoding::BASE32HEX_NOPAD;
use ring::digest;

use crate::rfc::domain::DomainName;
use crate::rfc::qtype::QType;
use crate::rfc::rdata::nsec::NSEC;
use crate::rfc::rdata::nsec3::{NSEC3, NSEC3_HASH_SHA1};

/// An (owner, rdata) pair as found in the authority section.
pub struct NsecRecord<'a> {
    pub owner: &'a DomainName,
    pub nsec: &'a NSEC,
}

pub struct Nsec3Record<'a> {
    pub owner: &'a DomainName,
    pub nsec3: &'a NSEC3,
}

// ---------- NSEC ----------

/// `name` falls in the gap between `owner` and `next` in canonical order.
/// The last NSEC of a zone wraps: its next name is the apex.
pub fn nsec_covers(record: &NsecRecord, name: &DomainName) -> bool {
    use std::cmp::Ordering::*;

    let after_owner = record.owner.canonical_cmp(name) == Less;
    match record.owner.canonical_cmp(&record.nsec.next) {
        Less => after_owner && name.canonical_cmp(&record.nsec.next) == Less,
        // wrap-around: everything after the owner, or before the apex
        Greater => after_owner || name.canonical_cmp(&record.nsec.next) == Less,
        Equal => false,
    }
}

pub fn nsec_matches(record: &NsecRecord, name: &DomainName) -> bool {
    record.owner == name
}

/// NODATA: an NSEC whose owner is `name` and whose bitmap carries neither the
/// queried type nor CNAME.
pub fn nsec_proves_no_data(records: &[NsecRecord], name: &DomainName, qtype: &QType) -> bool {
    records.iter().any(|r| {
        nsec_matches(r, name) && !r.nsec.types.contains(qtype) && !r.nsec.types.contains(&QType::CNAME)
    })
}

/// NXDOMAIN: `name` is covered, and the wildcard at the closest encloser is
/// denied too (covered or provably NODATA for the type).
pub fn nsec_proves_name_error(records: &[NsecRecord], name: &DomainName) -> bool {
    let covering = match records.iter().find(|r| nsec_covers(r, name)) {
        Some(r) => r,
        None => return false,
    };

    // the closest encloser is the longest common ancestor of the covered
    // name and the covering pair
    let encloser = closest_common_ancestor(name, covering.owner, &covering.nsec.next);
    let wildcard = match wildcard_of(&encloser) {
        Some(w) => w,
        None => return false,
    };

    records
        .iter()
        .any(|r| nsec_covers(r, &wildcard) || nsec_matches(r, &wildcard))
}

fn closest_common_ancestor(name: &DomainName, owner: &DomainName, next: &DomainName) -> DomainName {
    let mut best = DomainName::root();
    for candidate in [owner, next] {
        for depth in (0..=candidate.label_count()).rev() {
            let suffix = candidate.suffix(depth);
            if name.is_subdomain_of(&suffix) && suffix.label_count() > best.label_count() {
                best = suffix;
                break;
            }
        }
    }
    best
}

fn wildcard_of(encloser: &DomainName) -> Option<DomainName> {
    let mut labels = vec!["*".to_string()];
    labels.extend(encloser.labels().iter().cloned());
    DomainName::from_labels(labels).ok()
}

// ---------- NSEC3 ----------

/// The iterated hash of RFC5155 §5: `H(x) = H(x || salt)`, applied
/// `iterations + 1` times over the canonical owner name.
pub fn nsec3_hash(name: &DomainName, algorithm: u8, salt: &[u8], iterations: u16) -> Option<Vec<u8>> {
    if algorithm != NSEC3_HASH_SHA1 {
        return None;
    }

    let mut input = name.canonical_bytes();
    input.extend_from_slice(salt);
    let mut hash = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &input)
        .as_ref()
        .to_vec();

    for _ in 0..iterations {
        let mut input = hash;
        input.extend_from_slice(salt);
        hash = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &input)
            .as_ref()
            .to_vec();
    }

    Some(hash)
}

/// The hashed owner carried by the record itself: its first label,
/// base32hex. `None` when the label does not decode.
pub fn nsec3_owner_hash(record: &Nsec3Record) -> Option<Vec<u8>> {
    let label = record.owner.labels().first()?;
    BASE32HEX_NOPAD.decode(label.to_ascii_uppercase().as_bytes()).ok()
}

fn hash_of(name: &DomainName, record: &Nsec3Record) -> Option<Vec<u8>> {
    nsec3_hash(
        name,
        record.nsec3.hash_algorithm,
        &record.nsec3.salt,
        record.nsec3.iterations,
    )
}

pub fn nsec3_matches(record: &Nsec3Record, name: &DomainName) -> bool {
    match (nsec3_owner_hash(record), hash_of(name, record)) {
        (Some(owner), Some(hash)) => owner == hash,
        _ => false,
    }
}

pub fn nsec3_covers(record: &Nsec3Record, name: &DomainName) -> bool {
    let (owner, hash) = match (nsec3_owner_hash(record), hash_of(name, record)) {
        (Some(owner), Some(hash)) => (owner, hash),
        _ => return false,
    };
    let next = &record.nsec3.next_hashed;

    if owner.as_slice() < next.as_slice() {
        owner < hash && hash < *next
    } else {
        // last record of the hash ring
        owner < hash || hash < *next
    }
}

/// The closest-encloser machinery of RFC5155 §8.3.
pub struct Nsec3NameError {
    pub closest_encloser: DomainName,
    pub opt_out: bool,
}

/// NXDOMAIN: find the closest encloser (longest ancestor whose hash matches
/// an NSEC3 owner), then require the next-closer name and the encloser's
/// wildcard to be covered.
pub fn nsec3_proves_name_error(records: &[Nsec3Record], name: &DomainName) -> Option<Nsec3NameError> {
    let (encloser, next_closer) = closest_encloser(records, name)?;

    let covering = records.iter().find(|r| nsec3_covers(r, &next_closer))?;

    let wildcard = wildcard_of(&encloser)?;
    records
        .iter()
        .any(|r| nsec3_covers(r, &wildcard))
        .then(|| Nsec3NameError {
            closest_encloser: encloser,
            opt_out: covering.nsec3.opt_out(),
        })
}

/// NODATA: an NSEC3 matching `name` whose bitmap carries neither `qtype` nor
/// CNAME.
pub fn nsec3_proves_no_data(records: &[Nsec3Record], name: &DomainName, qtype: &QType) -> bool {
    records.iter().any(|r| {
        nsec3_matches(r, name)
            && !r.nsec3.types.contains(qtype)
            && !r.nsec3.types.contains(&QType::CNAME)
    })
}

/// Denial of DS at a delegation. `Some(true)` means an insecure delegation
/// was authenticated (no DS bit while NS is present, or an opt-out range).
pub fn nsec3_proves_no_ds(records: &[Nsec3Record], name: &DomainName) -> Option<bool> {
    if let Some(record) = records.iter().find(|r| nsec3_matches(r, name)) {
        if record.nsec3.types.contains(&QType::DS) {
            return Some(false);
        }
        // an insecure delegation has NS without DS
        return Some(record.nsec3.types.contains(&QType::NS));
    }

    // opt-out: the name hashes into a covered span whose record has the
    // opt-out flag, so an unsigned delegation may exist there
    records
        .iter()
        .find(|r| nsec3_covers(r, name))
        .map(|r| r.nsec3.opt_out())
}

/// Wildcard answers: the RRSIG label count promised expansion from
/// `*.<encloser>`; the proof requires the next-closer name to be covered so
/// no more specific name exists.
pub fn nsec3_proves_wildcard(records: &[Nsec3Record], name: &DomainName, encloser_labels: u8) -> bool {
    if encloser_labels as usize >= name.label_count() {
        return false;
    }
    let next_closer = name.suffix(encloser_labels as usize + 1);
    records.iter().any(|r| nsec3_covers(r, &next_closer))
}

fn closest_encloser(records: &[Nsec3Record], name: &DomainName) -> Option<(DomainName, DomainName)> {
    for depth in (0..name.label_count()).rev() {
        let candidate = name.suffix(depth);
        if records.iter().any(|r| nsec3_matches(r, &candidate)) {
            let next_closer = name.suffix(depth + 1);
            return Some((candidate, next_closer));
        }
    }
    None
}
