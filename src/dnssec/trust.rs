//! Configured trust anchors: an immutable mapping from zone name to the DS
//! or DNSKEY records trusted a priori. Built once at library boot, read-only
//! afterwards.
use std::collections::HashMap;

use data_encoding::HEXUPPER;

use crate::rfc::domain::DomainName;
use crate::rfc::rdata::algorithm::{Algorithm, DigestType};
use crate::rfc::rdata::dnskey::DNSKEY;
use crate::rfc::rdata::ds::DS;

#[derive(Debug, Clone)]
pub enum TrustAnchor {
    Ds(DS),
    Key(DNSKEY),
}

impl TrustAnchor {
    /// Does `key` for `owner` match this anchor?
    pub fn matches(&self, owner: &DomainName, key: &DNSKEY) -> bool {
        match self {
            TrustAnchor::Ds(ds) => crate::dnssec::keys::ds_matches(owner, key, ds),
            TrustAnchor::Key(anchor) => anchor == key,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct TrustAnchors {
    anchors: HashMap<DomainName, Vec<TrustAnchor>>,
}

impl TrustAnchors {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The root key signing keys currently in use (KSK-2017, tag 20326, and
    /// KSK-2024, tag 38696), as published at
    /// https://data.iana.org/root-anchors/root-anchors.xml
    pub fn default_root() -> Self {
        let mut anchors = Self::empty();
        anchors.add_ds(
            DomainName::root(),
            DS {
                key_tag: 20326,
                algorithm: Algorithm::RSASHA256,
                digest_type: DigestType::SHA256,
                digest: HEXUPPER
                    .decode(b"E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D")
                    .unwrap(),
            },
        );
        anchors.add_ds(
            DomainName::root(),
            DS {
                key_tag: 38696,
                algorithm: Algorithm::RSASHA256,
                digest_type: DigestType::SHA256,
                digest: HEXUPPER
                    .decode(b"683D2D0ACB8C9B712A1948B27F741219298D0A450D612C483AF444A4C0FB2B16")
                    .unwrap(),
            },
        );
        anchors
    }

    pub fn add_ds(&mut self, zone: DomainName, ds: DS) {
        self.anchors.entry(zone).or_default().push(TrustAnchor::Ds(ds));
    }

    pub fn add_key(&mut self, zone: DomainName, key: DNSKEY) {
        self.anchors.entry(zone).or_default().push(TrustAnchor::Key(key));
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// The deepest configured zone at or above `name`, with its anchors.
    pub fn deepest_for(&self, name: &DomainName) -> Option<(DomainName, &[TrustAnchor])> {
        let mut best: Option<(DomainName, &[TrustAnchor])> = None;
        for (zone, anchors) in &self.anchors {
            if name.is_subdomain_of(zone) {
                let deeper = best
                    .as_ref()
                    .map(|(found, _)| zone.label_count() > found.label_count())
                    .unwrap_or(true);
                if deeper {
                    best = Some((zone.clone(), anchors.as_slice()));
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deepest_anchor_wins() {
        let mut anchors = TrustAnchors::default_root();
        anchors.add_ds(
            "example.com".parse().unwrap(),
            DS {
                key_tag: 1,
                algorithm: Algorithm::ED25519,
                digest_type: DigestType::SHA256,
                digest: vec![0; 32],
            },
        );

        let name: DomainName = "www.example.com".parse().unwrap();
        let (zone, _) = anchors.deepest_for(&name).unwrap();
        assert_eq!(zone.to_string(), "example.com.");

        let name: DomainName = "example.org".parse().unwrap();
        let (zone, _) = anchors.deepest_for(&name).unwrap();
        assert!(zone.is_root());
    }
}
