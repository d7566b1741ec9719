//! DNSSEC validation against a small Ed25519-signed world: keys are
//! generated per test, records signed over this codec's canonical bytes, and
//! the validator must agree with itself end to end.
mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use data_encoding::BASE32HEX_NOPAD;
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair};

use recursor::dnssec::denial::nsec3_hash;
use recursor::dnssec::keys::ds_digest;
use recursor::dnssec::trust::TrustAnchors;
use recursor::dnssec::{ChainFetcher, TrustState, Validator};
use recursor::error::{DNSError, DNSResult, DnssecError};
use recursor::resolver::{Resolver, ResolverOptions};
use recursor::rfc::domain::DomainName;
use recursor::rfc::message::Message;
use recursor::rfc::qtype::QType;
use recursor::rfc::question::Question;
use recursor::rfc::rdata::algorithm::{Algorithm, DigestType};
use recursor::rfc::rdata::dnskey::DNSKEY;
use recursor::rfc::rdata::ds::DS;
use recursor::rfc::rdata::nsec::TypeBitmap;
use recursor::rfc::rdata::nsec3::{NSEC3, NSEC3_FLAG_OPT_OUT, NSEC3_HASH_SHA1};
use recursor::rfc::rdata::rrsig::RRSIG;
use recursor::rfc::rdata::RData;
use recursor::rfc::resource_record::ResourceRecord;
use recursor::rfc::response_code::ResponseCode;
use recursor::rfc::rrset::RRSet;

use common::*;

fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as u32
}

/// One zone's signing key.
struct Signer {
    pair: Ed25519KeyPair,
    dnskey: DNSKEY,
    zone: DomainName,
}

impl Signer {
    fn new(zone: &str) -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();

        let dnskey = DNSKEY {
            flags: 257,
            protocol: 3,
            algorithm: Algorithm::ED25519,
            public_key: pair.public_key().as_ref().to_vec(),
        };

        Self {
            pair,
            dnskey,
            zone: name(zone),
        }
    }

    fn dnskey_rr(&self) -> ResourceRecord {
        ResourceRecord::new(
            self.zone.clone(),
            QType::DNSKEY,
            3600,
            RData::DNSKEY(self.dnskey.clone()),
        )
    }

    fn ds(&self) -> DS {
        DS {
            key_tag: self.dnskey.key_tag(),
            algorithm: self.dnskey.algorithm,
            digest_type: DigestType::SHA256,
            digest: ds_digest(&self.zone, &self.dnskey, &DigestType::SHA256).unwrap(),
        }
    }

    fn ds_rr(&self) -> ResourceRecord {
        ResourceRecord::new(self.zone.clone(), QType::DS, 3600, RData::DS(self.ds()))
    }

    /// Sign one RRset and return the RRSIG record to place beside it.
    fn sign(&self, records: &[ResourceRecord], inception: u32, expiration: u32) -> ResourceRecord {
        let set = RRSet::from_records(records.to_vec()).unwrap();
        let owner = set.name().clone();

        let mut rrsig = RRSIG {
            type_covered: set.qtype(),
            algorithm: Algorithm::ED25519,
            labels: owner.label_count() as u8,
            original_ttl: set.ttl(),
            expiration,
            inception,
            key_tag: self.dnskey.key_tag(),
            signer_name: self.zone.clone(),
            signature: Vec::new(),
        };

        let signed = set.signed_bytes(&rrsig);
        rrsig.signature = self.pair.sign(&signed).as_ref().to_vec();

        ResourceRecord::new(owner, QType::RRSIG, set.ttl(), RData::RRSIG(rrsig))
    }

    /// The authoritative, self-signed DNSKEY answer for this zone.
    fn keyset_response(&self, inception: u32, expiration: u32) -> Message {
        let keyset = vec![self.dnskey_rr()];
        let sig = self.sign(&keyset, inception, expiration);
        let mut records = keyset;
        records.push(sig);
        answer(records)
    }
}

/// A fetcher answering from a fixed table, for validator-level tests.
#[derive(Default)]
struct ScriptedFetcher {
    replies: HashMap<(String, u16), Message>,
}

impl ScriptedFetcher {
    fn script(&mut self, qname: &str, qtype: QType, message: Message) {
        self.replies
            .insert((qname.to_string(), qtype.code()), message);
    }
}

#[async_trait]
impl ChainFetcher for ScriptedFetcher {
    async fn fetch(&self, name: &DomainName, qtype: QType) -> DNSResult<Message> {
        self.replies
            .get(&(name.to_string(), qtype.code()))
            .cloned()
            .ok_or_else(|| DNSError::new("unscripted chain fetch"))
    }
}

fn window() -> (u32, u32) {
    let now = unix_now();
    (now - 3600, now + 86400)
}

fn key_anchor(signer: &Signer) -> Arc<TrustAnchors> {
    let mut anchors = TrustAnchors::empty();
    anchors.add_key(signer.zone.clone(), signer.dnskey.clone());
    Arc::new(anchors)
}

// full-ring NSEC3 helpers

fn hashed_owner_name(target: &DomainName, zone: &str) -> DomainName {
    let hash = nsec3_hash(target, NSEC3_HASH_SHA1, &[], 0).unwrap();
    let label = BASE32HEX_NOPAD.encode(&hash).to_ascii_lowercase();
    name(&format!("{}.{}", label, zone))
}

fn nsec3_matching(target: &DomainName, zone: &str, types: Vec<u16>) -> ResourceRecord {
    let rdata = NSEC3 {
        hash_algorithm: NSEC3_HASH_SHA1,
        flags: 0,
        iterations: 0,
        salt: Vec::new(),
        next_hashed: vec![0xFF; 20],
        types: TypeBitmap::from_types(types),
    };
    ResourceRecord::new(
        hashed_owner_name(target, zone),
        QType::NSEC3,
        300,
        RData::NSEC3(rdata),
    )
}

fn nsec3_covering(target: &DomainName, zone: &str, flags: u8) -> ResourceRecord {
    let hash = nsec3_hash(target, NSEC3_HASH_SHA1, &[], 0).unwrap();
    let mut low = hash.clone();
    let mut high = hash;
    *low.last_mut().unwrap() = low.last().unwrap().wrapping_sub(1);
    *high.last_mut().unwrap() = high.last().unwrap().wrapping_add(1);

    let rdata = NSEC3 {
        hash_algorithm: NSEC3_HASH_SHA1,
        flags,
        iterations: 0,
        salt: Vec::new(),
        next_hashed: high,
        types: TypeBitmap::from_types(vec![1]),
    };
    let owner = name(&format!(
        "{}.{}",
        BASE32HEX_NOPAD.encode(&low).to_ascii_lowercase(),
        zone
    ));
    ResourceRecord::new(owner, QType::NSEC3, 300, RData::NSEC3(rdata))
}

// ---------- validator-level tests ----------

#[tokio::test]
async fn secure_answer() {
    let signer = Signer::new("example");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(inception, expiration),
    );

    let records = vec![a_rr("www.example", "192.0.2.1")];
    let sig = signer.sign(&records, inception, expiration);
    let mut response = answer(records);
    response.answers.push(sig);

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::new("www.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Secure);
    assert!(outcome
        .verified
        .iter()
        .any(|(owner, qtype)| owner == &name("www.example") && *qtype == QType::A));
}

#[tokio::test]
async fn expired_signature_is_bogus() {
    let signer = Signer::new("example");
    let now = unix_now();
    let (inception, expiration) = (now - 86400, now - 3600);

    let mut fetcher = ScriptedFetcher::default();
    // the key set itself is still within its window
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(now - 3600, now + 86400),
    );

    let records = vec![a_rr("www.example", "192.0.2.1")];
    let sig = signer.sign(&records, inception, expiration);
    let mut response = answer(records);
    response.answers.push(sig);

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::new("www.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, now).await;

    assert_eq!(outcome.state, TrustState::Bogus);
    assert!(outcome.reason.unwrap().contains("expired"));
}

#[tokio::test]
async fn not_yet_valid_signature_is_bogus() {
    let signer = Signer::new("example");
    let now = unix_now();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(now - 3600, now + 86400),
    );

    let records = vec![a_rr("www.example", "192.0.2.1")];
    let sig = signer.sign(&records, now + 3600, now + 86400);
    let mut response = answer(records);
    response.answers.push(sig);

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::new("www.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, now).await;

    assert_eq!(outcome.state, TrustState::Bogus);
    assert!(outcome.reason.unwrap().contains("not yet valid"));
}

#[tokio::test]
async fn tampered_rdata_is_bogus() {
    let signer = Signer::new("example");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(inception, expiration),
    );

    let records = vec![a_rr("www.example", "192.0.2.1")];
    let sig = signer.sign(&records, inception, expiration);
    // the signature was made over a different address
    let mut response = answer(vec![a_rr("www.example", "192.0.2.66")]);
    response.answers.push(sig);

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::new("www.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Bogus);
}

#[tokio::test]
async fn chain_through_ds() {
    let root = Signer::new(".");
    let child = Signer::new("example");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(".", QType::DNSKEY, root.keyset_response(inception, expiration));
    fetcher.script(
        "example.",
        QType::DNSKEY,
        child.keyset_response(inception, expiration),
    );

    // the DS set lives in the root zone, signed by the root key
    let ds_records = vec![child.ds_rr()];
    let ds_sig = root.sign(&ds_records, inception, expiration);
    let mut ds_response = answer(ds_records);
    ds_response.answers.push(ds_sig);
    fetcher.script("example.", QType::DS, ds_response);

    let mut anchors = TrustAnchors::empty();
    anchors.add_key(DomainName::root(), root.dnskey.clone());

    let records = vec![a_rr("www.example", "192.0.2.1")];
    let sig = child.sign(&records, inception, expiration);
    let mut response = answer(records);
    response.answers.push(sig);

    let validator = Validator::new(Arc::new(anchors), Arc::new(fetcher));
    let question = Question::new("www.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Secure);
}

#[tokio::test]
async fn optout_delegation_is_insecure() {
    let root = Signer::new(".");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(".", QType::DNSKEY, root.keyset_response(inception, expiration));

    // DS example: NODATA from the root, with an opt-out span covering the
    // child's hash
    let soa = soa_rr(".");
    let soa_sig = root.sign(&[soa.clone()], inception, expiration);
    let cover = nsec3_covering(&name("example"), ".", NSEC3_FLAG_OPT_OUT);
    let cover_sig = root.sign(&[cover.clone()], inception, expiration);

    let mut ds_response = no_data(".");
    ds_response.authorities = vec![soa, soa_sig, cover, cover_sig];
    fetcher.script("example.", QType::DS, ds_response);

    let mut anchors = TrustAnchors::empty();
    anchors.add_key(DomainName::root(), root.dnskey.clone());

    // the answer itself is unsigned, as an insecure zone's answers are
    let mut response = answer(vec![a_rr("www.example", "192.0.2.1")]);
    response.authorities.push(soa_rr("example"));

    let validator = Validator::new(Arc::new(anchors), Arc::new(fetcher));
    let question = Question::new("www.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Insecure);
}

#[tokio::test]
async fn nxdomain_with_nsec3_proof() {
    let signer = Signer::new("example");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(inception, expiration),
    );

    let qname = name("no-such-name.example");

    // closest encloser: the apex, matched by hash
    let apex = nsec3_matching(&name("example"), "example", vec![2, 6, 48, 51]);
    // next closer and wildcard, both covered
    let next_closer = nsec3_covering(&qname, "example", 0);
    let wildcard = nsec3_covering(&name("*.example"), "example", 0);
    let soa = soa_rr("example");

    let mut response = nx_domain("example");
    response.authorities.clear();
    for rr in [soa, apex, next_closer, wildcard] {
        let sig = signer.sign(&[rr.clone()], inception, expiration);
        response.authorities.push(rr);
        response.authorities.push(sig);
    }

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::with_name(qname, QType::A);
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Secure);
}

#[tokio::test]
async fn nxdomain_without_proof_is_bogus() {
    let signer = Signer::new("example");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(inception, expiration),
    );

    // a signed SOA but no NSEC/NSEC3 at all
    let soa = soa_rr("example");
    let sig = signer.sign(&[soa.clone()], inception, expiration);
    let mut response = nx_domain("example");
    response.authorities = vec![soa, sig];

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::new("gone.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Bogus);
}

#[tokio::test]
async fn nodata_with_nsec3_proof() {
    let signer = Signer::new("example");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(inception, expiration),
    );

    // the name exists with A only; the AAAA query gets a matching NSEC3
    let qname = name("www.example");
    let matching = nsec3_matching(&qname, "example", vec![1, 46]);
    let soa = soa_rr("example");

    let mut response = no_data("example");
    response.authorities.clear();
    for rr in [soa, matching] {
        let sig = signer.sign(&[rr.clone()], inception, expiration);
        response.authorities.push(rr);
        response.authorities.push(sig);
    }

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::with_name(qname, QType::AAAA);
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Secure);
}

#[tokio::test]
async fn key_trap_exhausts_budget() {
    let signer = Signer::new("example");
    let (inception, expiration) = window();

    let mut fetcher = ScriptedFetcher::default();
    fetcher.script(
        "example.",
        QType::DNSKEY,
        signer.keyset_response(inception, expiration),
    );

    let records = vec![a_rr("www.example", "192.0.2.1")];
    let good = signer.sign(&records, inception, expiration);

    // many same-tag signatures that all fail verification
    let mut response = answer(records);
    for _ in 0..20 {
        let mut bad = good.clone();
        if let RData::RRSIG(sig) = &mut bad.rdata {
            sig.signature = vec![0u8; 64];
        }
        response.answers.push(bad);
    }

    let validator = Validator::new(key_anchor(&signer), Arc::new(fetcher));
    let question = Question::new("www.example", QType::A, None).unwrap();
    let outcome = validator.validate_at(&response, &question, unix_now()).await;

    assert_eq!(outcome.state, TrustState::Bogus);
    assert!(outcome.reason.unwrap().contains("budget"));
}

// ---------- resolver-level tests ----------

const EXAMPLE_IP: &str = "10.0.2.1";

/// The scripted two-zone world: a signed root delegating a signed "example"
/// TLD. Returns the dispatcher, the anchors and the leaf signature window.
fn signed_world(inception: u32, expiration: u32) -> (Arc<ScriptedDispatcher>, Arc<TrustAnchors>) {
    let root = Signer::new(".");
    let child = Signer::new("example");
    let (now_i, now_e) = window();

    let dispatcher = Arc::new(ScriptedDispatcher::new());

    // the root answers key material itself, and refers everything else down
    dispatcher.script(
        ROOT_IP,
        ".",
        QType::DNSKEY,
        Reply::Answer(root.keyset_response(now_i, now_e)),
    );
    let ds_records = vec![child.ds_rr()];
    let ds_sig = root.sign(&ds_records, now_i, now_e);
    let mut ds_response = answer(ds_records);
    ds_response.answers.push(ds_sig);
    dispatcher.script(ROOT_IP, "example.", QType::DS, Reply::Answer(ds_response));

    dispatcher.script(
        ROOT_IP,
        "www.example.",
        QType::A,
        Reply::Answer(referral("example", &[("ns.example", Some(EXAMPLE_IP))])),
    );
    dispatcher.script(
        ROOT_IP,
        "example.",
        QType::DNSKEY,
        Reply::Answer(referral("example", &[("ns.example", Some(EXAMPLE_IP))])),
    );

    // the leaf zone
    dispatcher.script(
        EXAMPLE_IP,
        "example.",
        QType::DNSKEY,
        Reply::Answer(child.keyset_response(now_i, now_e)),
    );
    let records = vec![a_rr("www.example", "198.51.100.7")];
    let sig = child.sign(&records, inception, expiration);
    let mut leaf = answer(records);
    leaf.answers.push(sig);
    dispatcher.script(EXAMPLE_IP, "www.example.", QType::A, Reply::Answer(leaf));

    let mut anchors = TrustAnchors::empty();
    anchors.add_key(DomainName::root(), root.dnskey.clone());

    (dispatcher, Arc::new(anchors))
}

fn dnssec_options(validate: bool) -> ResolverOptions {
    ResolverOptions {
        qname_minimization: false,
        dnssec_validation: validate,
        ..Default::default()
    }
}

#[tokio::test]
async fn full_resolution_sets_ad_for_secure_chain() {
    let (inception, expiration) = window();
    let (dispatcher, anchors) = signed_world(inception, expiration);

    let resolver = Resolver::new(dispatcher)
        .with_roots(test_roots())
        .with_trust_anchors(anchors);

    let question = Question::new("www.example", QType::A, None).unwrap();
    let response = resolver.resolve(&question, &dnssec_options(true)).await.unwrap();

    assert_eq!(response.rcode(), ResponseCode::NoError);
    assert!(response.header.flags.authentic_data);
    // the address and its signature both come back
    assert!(response.answers.iter().any(|rr| matches!(rr.rdata, RData::A(_))));
    assert!(response.answers.iter().any(|rr| matches!(rr.rdata, RData::RRSIG(_))));
}

#[tokio::test]
async fn expired_chain_is_servfail_or_plain_answer() {
    let now = unix_now();
    let (dispatcher, anchors) = signed_world(now - 86400, now - 3600);

    let resolver = Resolver::new(dispatcher)
        .with_roots(test_roots())
        .with_trust_anchors(anchors);
    let question = Question::new("www.example", QType::A, None).unwrap();

    // with validation on, the expired signature is fatal
    let outcome = resolver.resolve(&question, &dnssec_options(true)).await;
    match outcome {
        Err(DNSError::Dnssec(DnssecError::Bogus(reason))) => {
            assert!(reason.contains("expired"))
        }
        other => panic!("expected a bogus failure, got {:?}", other.map(|m| m.rcode())),
    }

    // with validation off, the answer is returned unauthenticated
    let response = resolver.resolve(&question, &dnssec_options(false)).await.unwrap();
    assert_eq!(response.rcode(), ResponseCode::NoError);
    assert!(!response.header.flags.authentic_data);
    assert!(response.answers.iter().any(|rr| matches!(rr.rdata, RData::A(_))));
}
