//! DNSSEC validation: chain of trust from the configured anchors, signature
//! verification, authenticated denial of existence, and the key-trap budget
//! that bounds CPU per response.
//!
//! The validator never mutates the response it classifies; the resolver
//! merges the outcome (AD bit, ServFail on Bogus) into what it returns.
pub mod denial;
pub mod keys;
pub mod trust;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use log::{debug, trace};

use crate::error::{DNSResult, DnssecError};
use crate::rfc::domain::DomainName;
use crate::rfc::message::Message;
use crate::rfc::qtype::QType;
use crate::rfc::question::Question;
use crate::rfc::rdata::dnskey::DNSKEY;
use crate::rfc::rdata::ds::DS;
use crate::rfc::rdata::rrsig::RRSIG;
use crate::rfc::rdata::RData;
use crate::rfc::response_code::ResponseCode;
use crate::rfc::rrset::RRSet;

use denial::{Nsec3Record, NsecRecord};
use trust::{TrustAnchor, TrustAnchors};

// key-trap budgets, per validated response
pub const MAX_RRSET_VALIDATIONS_PER_SUSPENSION: u32 = 8;
pub const MAX_CRYPTO_FAILURES: u32 = 16;
pub const MAX_SUSPENSIONS_PER_RESPONSE: u32 = 16;

/// Default tolerated clock skew when checking signature validity windows.
pub const DEFAULT_CLOCK_SKEW: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustState {
    /// Chain proven from a trust anchor, signatures valid.
    Secure,
    /// Authenticated denial of DS at some cut: the zone opted out of DNSSEC.
    Insecure,
    /// Chain broken or a signature invalid.
    Bogus,
    /// No anchor reaches the zone.
    Indeterminate,
}

impl TrustState {
    pub fn code(&self) -> u8 {
        match self {
            TrustState::Secure => 0,
            TrustState::Insecure => 1,
            TrustState::Bogus => 2,
            TrustState::Indeterminate => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TrustState::Secure),
            1 => Some(TrustState::Insecure),
            2 => Some(TrustState::Bogus),
            3 => Some(TrustState::Indeterminate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub state: TrustState,
    pub reason: Option<String>,
    /// (owner, type) of every RRset whose signature verified; only filled
    /// for Secure outcomes.
    pub verified: Vec<(DomainName, QType)>,
}

impl ValidationOutcome {
    fn secure(verified: Vec<(DomainName, QType)>) -> Self {
        Self {
            state: TrustState::Secure,
            reason: None,
            verified,
        }
    }

    fn insecure(reason: &str) -> Self {
        Self {
            state: TrustState::Insecure,
            reason: Some(reason.to_string()),
            verified: Vec::new(),
        }
    }

    fn bogus(reason: &str) -> Self {
        Self {
            state: TrustState::Bogus,
            reason: Some(reason.to_string()),
            verified: Vec::new(),
        }
    }

    fn indeterminate() -> Self {
        Self {
            state: TrustState::Indeterminate,
            reason: None,
            verified: Vec::new(),
        }
    }
}

// internal short-circuiting: Err(outcome) unwinds the classification
type Classify<T> = Result<T, ValidationOutcome>;

/// The key-trap budgets. Exhausting any of them classifies the response as
/// Bogus with a `BudgetExhausted` reason.
#[derive(Debug)]
struct Budget {
    verifications_left: u32,
    crypto_failures_left: u32,
    suspensions_left: u32,
}

impl Budget {
    fn new() -> Self {
        Self {
            verifications_left: MAX_RRSET_VALIDATIONS_PER_SUSPENSION,
            crypto_failures_left: MAX_CRYPTO_FAILURES,
            suspensions_left: MAX_SUSPENSIONS_PER_RESPONSE,
        }
    }

    fn exhausted() -> ValidationOutcome {
        ValidationOutcome::bogus(&DnssecError::BudgetExhausted.to_string())
    }

    // every await to fetch chain material is a suspension; the verification
    // allowance refills each time
    fn suspend(&mut self) -> Classify<()> {
        if self.suspensions_left == 0 {
            return Err(Self::exhausted());
        }
        self.suspensions_left -= 1;
        self.verifications_left = MAX_RRSET_VALIDATIONS_PER_SUSPENSION;
        Ok(())
    }

    fn verification(&mut self) -> Classify<()> {
        if self.verifications_left == 0 {
            return Err(Self::exhausted());
        }
        self.verifications_left -= 1;
        Ok(())
    }

    fn crypto_failure(&mut self) -> Classify<()> {
        if self.crypto_failures_left == 0 {
            return Err(Self::exhausted());
        }
        self.crypto_failures_left -= 1;
        Ok(())
    }
}

/// How the validator obtains DNSKEY and DS RRsets for intermediate zones.
/// The resolver implements this with checking-disabled sub-queries.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch(&self, name: &DomainName, qtype: QType) -> DNSResult<Message>;
}

#[derive(Debug, Clone)]
struct ZoneKeys {
    apex: DomainName,
    keys: Vec<DNSKEY>,
}

enum KeyCheck<'a> {
    Anchors(&'a [TrustAnchor]),
    Ds(&'a [DS]),
}

impl KeyCheck<'_> {
    fn matches(&self, owner: &DomainName, key: &DNSKEY) -> bool {
        match self {
            KeyCheck::Anchors(anchors) => anchors.iter().any(|a| a.matches(owner, key)),
            KeyCheck::Ds(ds_set) => ds_set.iter().any(|ds| keys::ds_matches(owner, key, ds)),
        }
    }
}

pub struct Validator {
    anchors: Arc<TrustAnchors>,
    fetcher: Arc<dyn ChainFetcher>,
    clock_skew: u32,
}

impl Validator {
    pub fn new(anchors: Arc<TrustAnchors>, fetcher: Arc<dyn ChainFetcher>) -> Self {
        Self {
            anchors,
            fetcher,
            clock_skew: DEFAULT_CLOCK_SKEW,
        }
    }

    pub fn with_clock_skew(mut self, seconds: u32) -> Self {
        self.clock_skew = seconds;
        self
    }

    /// Classify `response` against the configured anchors, at the current
    /// time.
    pub async fn validate(&self, response: &Message, question: &Question) -> ValidationOutcome {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        self.validate_at(response, question, now).await
    }

    /// Same, with an explicit notion of "now" (tests, replaying captures).
    pub async fn validate_at(
        &self,
        response: &Message,
        question: &Question,
        now: u32,
    ) -> ValidationOutcome {
        match self.classify(response, question, now).await {
            Ok(outcome) | Err(outcome) => outcome,
        }
    }

    async fn classify(
        &self,
        response: &Message,
        question: &Question,
        now: u32,
    ) -> Classify<ValidationOutcome> {
        if self.anchors.is_empty() {
            return Ok(ValidationOutcome::indeterminate());
        }

        let mut budget = Budget::new();
        let mut keys_cache: HashMap<DomainName, ZoneKeys> = HashMap::new();

        let answer_sets = response.answer_rrsets();
        let authority_sets = response.authority_rrsets();

        // split data from signatures, pair each data set with its sigs
        let mut data: Vec<(&RRSet, Vec<&RRSIG>)> = Vec::new();
        for section in [&answer_sets, &authority_sets] {
            for set in section.iter().filter(|s| s.qtype() != QType::RRSIG) {
                let sigs = covering_sigs(section, set);
                data.push((set, sigs));
            }
        }

        let any_signed = data.iter().any(|(_, sigs)| !sigs.is_empty());
        if !any_signed {
            // nothing carries a signature: either the zone provably opted
            // out, or the chain is broken
            let zone = unsigned_zone_guess(response, &question.name);
            return match self
                .chain_to(&zone, &mut keys_cache, &mut budget, now)
                .await
            {
                Ok(_) => Err(ValidationOutcome::bogus("expected signatures, got none")),
                Err(outcome) => Err(outcome),
            };
        }

        // verify every signed data set; an unsigned set inside a signed
        // answer breaks the chain
        let mut verified = Vec::new();
        for (set, sigs) in &data {
            if sigs.is_empty() {
                return Err(ValidationOutcome::bogus(&format!(
                    "RRset {}/{} carries no signature",
                    set.name(),
                    set.qtype()
                )));
            }
            self.verify_set(set, sigs, &mut keys_cache, &mut budget, now)
                .await?;
            verified.push((set.name().clone(), set.qtype()));
        }

        // wildcard expansions must come with a proof that no closer name
        // exists
        for (set, sigs) in &data {
            for sig in sigs {
                if (sig.labels as usize) < set.name().label_count()
                    && set.qtype() != QType::NSEC
                    && set.qtype() != QType::NSEC3
                {
                    if !self.wildcard_denied(&authority_sets, set.name(), sig.labels) {
                        return Err(ValidationOutcome::bogus(
                            "wildcard expansion without a no-closer-match proof",
                        ));
                    }
                }
            }
        }

        // negative answers need authenticated denial
        let wants_answer = !answer_sets
            .iter()
            .any(|s| s.qtype() == question.qtype && s.name() == &question.name);
        let has_cname = answer_sets
            .iter()
            .any(|s| s.qtype() == QType::CNAME && s.name() == &question.name);

        if response.rcode() == ResponseCode::NXDomain {
            self.check_name_error(&authority_sets, &question.name)?;
        } else if wants_answer && !has_cname {
            self.check_no_data(&authority_sets, &question.name, &question.qtype)?;
        }

        Ok(ValidationOutcome::secure(verified))
    }

    fn check_name_error(
        &self,
        authority: &[RRSet],
        qname: &DomainName,
    ) -> Classify<()> {
        let nsec3 = collect_nsec3(authority);
        if !nsec3.is_empty() {
            return match denial::nsec3_proves_name_error(&nsec3, qname) {
                Some(proof) if proof.opt_out => Err(ValidationOutcome::insecure(
                    "NXDOMAIN proven only through an opt-out span",
                )),
                Some(_) => Ok(()),
                None => Err(ValidationOutcome::bogus("NXDOMAIN without a valid NSEC3 proof")),
            };
        }

        let nsec = collect_nsec(authority);
        if !nsec.is_empty() {
            return if denial::nsec_proves_name_error(&nsec, qname) {
                Ok(())
            } else {
                Err(ValidationOutcome::bogus("NXDOMAIN without a valid NSEC proof"))
            };
        }

        Err(ValidationOutcome::bogus("NXDOMAIN without denial records"))
    }

    fn check_no_data(
        &self,
        authority: &[RRSet],
        qname: &DomainName,
        qtype: &QType,
    ) -> Classify<()> {
        let nsec3 = collect_nsec3(authority);
        if !nsec3.is_empty() {
            if denial::nsec3_proves_no_data(&nsec3, qname, qtype) {
                return Ok(());
            }
            if *qtype == QType::DS {
                return match denial::nsec3_proves_no_ds(&nsec3, qname) {
                    Some(true) => Err(ValidationOutcome::insecure("no DS at an opted-out cut")),
                    _ => Err(ValidationOutcome::bogus("NODATA for DS without proof")),
                };
            }
            return Err(ValidationOutcome::bogus("NODATA without a valid NSEC3 proof"));
        }

        let nsec = collect_nsec(authority);
        if !nsec.is_empty() {
            return if denial::nsec_proves_no_data(&nsec, qname, qtype) {
                Ok(())
            } else {
                Err(ValidationOutcome::bogus("NODATA without a valid NSEC proof"))
            };
        }

        Err(ValidationOutcome::bogus("NODATA without denial records"))
    }

    fn wildcard_denied(&self, authority: &[RRSet], name: &DomainName, sig_labels: u8) -> bool {
        let nsec3 = collect_nsec3(authority);
        if denial::nsec3_proves_wildcard(&nsec3, name, sig_labels) {
            return true;
        }

        let nsec = collect_nsec(authority);
        let next_closer = name.suffix(sig_labels as usize + 1);
        nsec.iter().any(|r| denial::nsec_covers(r, &next_closer))
    }

    /// Verify one RRset against its signatures, resolving the signer's zone
    /// keys through the chain of trust.
    async fn verify_set(
        &self,
        set: &RRSet,
        sigs: &[&RRSIG],
        keys_cache: &mut HashMap<DomainName, ZoneKeys>,
        budget: &mut Budget,
        now: u32,
    ) -> Classify<()> {
        let mut last_reason = DnssecError::KeyTagMismatch;
        let mut all_unsupported = true;

        for sig in sigs {
            if !set.name().is_subdomain_of(&sig.signer_name) {
                continue;
            }

            if !keys::algorithm_supported(&sig.algorithm) {
                continue;
            }
            all_unsupported = false;

            if !self.time_valid(sig, now) {
                last_reason = if now > sig.expiration {
                    DnssecError::SignatureExpired
                } else {
                    DnssecError::SignatureNotYetValid
                };
                continue;
            }

            let zone_keys = self
                .chain_to(&sig.signer_name, keys_cache, budget, now)
                .await?;

            let signed = set.signed_bytes(sig);
            for key in zone_keys
                .keys
                .iter()
                .filter(|k| k.key_tag() == sig.key_tag && k.algorithm == sig.algorithm)
                .filter(|k| k.is_zone_key())
            {
                budget.verification()?;
                match keys::verify_signature(key, &signed, &sig.signature) {
                    Ok(()) => {
                        trace!("verified {}/{} via {}", set.name(), set.qtype(), sig.signer_name);
                        return Ok(());
                    }
                    Err(DnssecError::UnsupportedAlgorithm) => continue,
                    Err(reason) => {
                        budget.crypto_failure()?;
                        last_reason = reason;
                    }
                }
            }
        }

        if all_unsupported {
            // no cryptographic claim possible for this set
            return Err(ValidationOutcome::insecure(
                "all covering signatures use unsupported algorithms",
            ));
        }
        Err(ValidationOutcome::bogus(&format!(
            "{}/{}: {}",
            set.name(),
            set.qtype(),
            last_reason
        )))
    }

    fn time_valid(&self, sig: &RRSIG, now: u32) -> bool {
        let early = sig.inception.saturating_sub(self.clock_skew);
        let late = sig.expiration.saturating_add(self.clock_skew);
        early <= now && now <= late
    }

    /// Walk the chain of trust from the deepest configured anchor down to
    /// `zone`, fetching DS and DNSKEY RRsets along the way. Each fetch is a
    /// suspension against the budget.
    async fn chain_to(
        &self,
        zone: &DomainName,
        keys_cache: &mut HashMap<DomainName, ZoneKeys>,
        budget: &mut Budget,
        now: u32,
    ) -> Classify<ZoneKeys> {
        if let Some(found) = keys_cache.get(zone) {
            return Ok(found.clone());
        }

        let (anchor_zone, anchor_list) = match self.anchors.deepest_for(zone) {
            Some(found) => found,
            None => return Err(ValidationOutcome::indeterminate()),
        };
        let anchor_list = anchor_list.to_vec();

        let mut current = self
            .fetch_keys(&anchor_zone, KeyCheck::Anchors(&anchor_list), budget, now)
            .await?;

        // walk one label at a time; names that are not cuts stay inside the
        // current zone
        let mut depth = anchor_zone.label_count();
        while &current.apex != zone {
            if depth >= zone.label_count() {
                return Err(ValidationOutcome::bogus(&format!(
                    "no chain from {} to signer {}",
                    current.apex, zone
                )));
            }
            let child = zone.suffix(depth + 1);
            depth += 1;

            budget.suspend()?;
            let ds_response = match self.fetcher.fetch(&child, QType::DS).await {
                Ok(response) => response,
                Err(e) => {
                    return Err(ValidationOutcome::bogus(&format!(
                        "DS lookup for {} failed: {}",
                        child, e
                    )))
                }
            };

            let answer_sets = ds_response.answer_rrsets();
            let ds_set = answer_sets
                .iter()
                .find(|s| s.qtype() == QType::DS && s.name() == &child);

            match ds_set {
                Some(set) => {
                    // the DS set lives in the parent zone: verify with the
                    // keys we already hold
                    let sigs = covering_sigs(&answer_sets, set);
                    self.verify_with_keys(set, &sigs, &current, budget, now)?;

                    let supported: Vec<DS> = set
                        .records()
                        .iter()
                        .filter_map(|rr| match &rr.rdata {
                            RData::DS(ds) => Some(ds.clone()),
                            _ => None,
                        })
                        .filter(|ds| {
                            keys::algorithm_supported(&ds.algorithm)
                                && keys::digest_supported(&ds.digest_type)
                        })
                        .collect();

                    if supported.is_empty() {
                        return Err(ValidationOutcome::insecure(&format!(
                            "no supported DS at {}",
                            child
                        )));
                    }

                    current = self
                        .fetch_keys(&child, KeyCheck::Ds(&supported), budget, now)
                        .await?;
                }
                None => {
                    // authenticated denial decides: insecure delegation,
                    // or just not a cut
                    let authority_sets = ds_response.authority_rrsets();
                    self.verify_denial_sets(&authority_sets, &current, budget, now)
                        .await?;

                    let nsec3 = collect_nsec3(&authority_sets);
                    if !nsec3.is_empty() {
                        match denial::nsec3_proves_no_ds(&nsec3, &child) {
                            Some(true) => {
                                return Err(ValidationOutcome::insecure(&format!(
                                    "authenticated absence of DS at {}",
                                    child
                                )))
                            }
                            Some(false) => continue,
                            None => {
                                return Err(ValidationOutcome::bogus(&format!(
                                    "no usable denial of DS at {}",
                                    child
                                )))
                            }
                        }
                    }

                    let nsec = collect_nsec(&authority_sets);
                    if !nsec.is_empty() {
                        let insecure_delegation = nsec.iter().any(|r| {
                            denial::nsec_matches(r, &child)
                                && r.nsec.types.contains(&QType::NS)
                                && !r.nsec.types.contains(&QType::DS)
                        });
                        if insecure_delegation {
                            return Err(ValidationOutcome::insecure(&format!(
                                "authenticated absence of DS at {}",
                                child
                            )));
                        }
                        let not_a_cut = nsec.iter().any(|r| {
                            denial::nsec_matches(r, &child) && !r.nsec.types.contains(&QType::NS)
                        }) || nsec.iter().any(|r| denial::nsec_covers(r, &child));
                        if not_a_cut {
                            continue;
                        }
                    }

                    return Err(ValidationOutcome::bogus(&format!(
                        "no usable denial of DS at {}",
                        child
                    )));
                }
            }
        }

        keys_cache.insert(zone.clone(), current.clone());
        Ok(current)
    }

    /// Fetch and validate the DNSKEY RRset of `zone`: one of its keys must
    /// match the anchor or DS material, and that key must sign the set.
    async fn fetch_keys(
        &self,
        zone: &DomainName,
        check: KeyCheck<'_>,
        budget: &mut Budget,
        now: u32,
    ) -> Classify<ZoneKeys> {
        budget.suspend()?;
        let response = match self.fetcher.fetch(zone, QType::DNSKEY).await {
            Ok(response) => response,
            Err(e) => {
                return Err(ValidationOutcome::bogus(&format!(
                    "DNSKEY lookup for {} failed: {}",
                    zone, e
                )))
            }
        };

        let answer_sets = response.answer_rrsets();
        let key_set = match answer_sets
            .iter()
            .find(|s| s.qtype() == QType::DNSKEY && s.name() == zone)
        {
            Some(set) => set,
            None => {
                return Err(ValidationOutcome::bogus(
                    &DnssecError::MissingDNSKEY.to_string(),
                ))
            }
        };

        let keys: Vec<DNSKEY> = key_set
            .records()
            .iter()
            .filter_map(|rr| match &rr.rdata {
                RData::DNSKEY(key) => Some(key.clone()),
                _ => None,
            })
            .collect();

        let sigs = covering_sigs(&answer_sets, key_set);
        for sig in &sigs {
            if &sig.signer_name != zone
                || !keys::algorithm_supported(&sig.algorithm)
                || !self.time_valid(sig, now)
            {
                continue;
            }
            for key in keys
                .iter()
                .filter(|k| k.key_tag() == sig.key_tag && k.algorithm == sig.algorithm)
            {
                if !check.matches(zone, key) {
                    continue;
                }
                budget.verification()?;
                let signed = key_set.signed_bytes(sig);
                match keys::verify_signature(key, &signed, &sig.signature) {
                    Ok(()) => {
                        debug!("DNSKEY set for {} anchored via tag {}", zone, sig.key_tag);
                        return Ok(ZoneKeys {
                            apex: zone.clone(),
                            keys,
                        });
                    }
                    Err(DnssecError::UnsupportedAlgorithm) => continue,
                    Err(_) => budget.crypto_failure()?,
                }
            }
        }

        Err(ValidationOutcome::bogus(&format!(
            "DNSKEY set of {} not anchored",
            zone
        )))
    }

    /// Verify an RRset with a fixed key set (no chain walk).
    fn verify_with_keys(
        &self,
        set: &RRSet,
        sigs: &[&RRSIG],
        zone_keys: &ZoneKeys,
        budget: &mut Budget,
        now: u32,
    ) -> Classify<()> {
        for sig in sigs {
            if sig.signer_name != zone_keys.apex
                || !keys::algorithm_supported(&sig.algorithm)
                || !self.time_valid(sig, now)
            {
                continue;
            }
            let signed = set.signed_bytes(sig);
            for key in zone_keys
                .keys
                .iter()
                .filter(|k| k.key_tag() == sig.key_tag && k.algorithm == sig.algorithm)
                .filter(|k| k.is_zone_key())
            {
                budget.verification()?;
                match keys::verify_signature(key, &signed, &sig.signature) {
                    Ok(()) => return Ok(()),
                    Err(DnssecError::UnsupportedAlgorithm) => continue,
                    Err(_) => budget.crypto_failure()?,
                }
            }
        }
        Err(ValidationOutcome::bogus(&format!(
            "{}/{} not signed by {}",
            set.name(),
            set.qtype(),
            zone_keys.apex
        )))
    }

    /// Every NSEC/NSEC3 set used for denial must itself be signed by the
    /// zone keys in hand.
    async fn verify_denial_sets(
        &self,
        authority_sets: &[RRSet],
        zone_keys: &ZoneKeys,
        budget: &mut Budget,
        now: u32,
    ) -> Classify<()> {
        for set in authority_sets
            .iter()
            .filter(|s| matches!(s.qtype(), QType::NSEC | QType::NSEC3 | QType::SOA))
        {
            let sigs = covering_sigs(authority_sets, set);
            if sigs.is_empty() {
                return Err(ValidationOutcome::bogus(&format!(
                    "unsigned {} in a denial",
                    set.qtype()
                )));
            }
            self.verify_with_keys(set, &sigs, zone_keys, budget, now)?;
        }
        Ok(())
    }
}

// the RRSIGs in `sets` covering `target`
fn covering_sigs<'a>(sets: &'a [RRSet], target: &RRSet) -> Vec<&'a RRSIG> {
    let mut sigs = Vec::new();
    for set in sets.iter().filter(|s| s.qtype() == QType::RRSIG) {
        if set.name() != target.name() {
            continue;
        }
        for rr in set.records() {
            if let RData::RRSIG(sig) = &rr.rdata {
                if sig.type_covered == target.qtype() {
                    sigs.push(sig);
                }
            }
        }
    }
    sigs
}

fn collect_nsec(sets: &[RRSet]) -> Vec<NsecRecord<'_>> {
    let mut records = Vec::new();
    for set in sets.iter().filter(|s| s.qtype() == QType::NSEC) {
        for rr in set.records() {
            if let RData::NSEC(nsec) = &rr.rdata {
                records.push(NsecRecord {
                    owner: &rr.name,
                    nsec,
                });
            }
        }
    }
    records
}

fn collect_nsec3(sets: &[RRSet]) -> Vec<Nsec3Record<'_>> {
    let mut records = Vec::new();
    for set in sets.iter().filter(|s| s.qtype() == QType::NSEC3) {
        for rr in set.records() {
            if let RData::NSEC3(nsec3) = &rr.rdata {
                records.push(Nsec3Record {
                    owner: &rr.name,
                    nsec3,
                });
            }
        }
    }
    records
}

// the zone to test when a response carries no signatures at all
fn unsigned_zone_guess(response: &Message, qname: &DomainName) -> DomainName {
    response
        .authorities
        .iter()
        .find(|rr| matches!(rr.r#type, QType::SOA | QType::NS))
        .map(|rr| rr.name.clone())
        .unwrap_or_else(|| qname.clone())
}
