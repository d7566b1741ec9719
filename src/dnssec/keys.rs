//! Public key handling and signature verification on top of `ring`.
//!
//! The DNSKEY rdata stores keys in per-algorithm formats: RSA as
//! exponent-length | exponent | modulus (RFC3110), ECDSA as the raw x | y
//! point coordinates (RFC6605), Ed25519 as the 32-byte point (RFC8080).
use ring::digest;
use ring::signature::{self, RsaPublicKeyComponents, UnparsedPublicKey};

use crate::error::DnssecError;
use crate::rfc::domain::DomainName;
use crate::rfc::rdata::algorithm::{Algorithm, DigestType};
use crate::rfc::rdata::dnskey::DNSKEY;
use crate::rfc::rdata::ds::DS;

/// Algorithms this validator can actually verify. ED448 is recognized on the
/// wire but no verification is available; chains requiring it make no
/// cryptographic claim and classify as Insecure.
pub fn algorithm_supported(algorithm: &Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::RSASHA1
            | Algorithm::RSASHA1NSEC3SHA1
            | Algorithm::RSASHA256
            | Algorithm::RSASHA512
            | Algorithm::ECDSAP256SHA256
            | Algorithm::ECDSAP384SHA384
            | Algorithm::ED25519
    )
}

pub fn digest_supported(digest_type: &DigestType) -> bool {
    matches!(
        digest_type,
        DigestType::SHA1 | DigestType::SHA256 | DigestType::SHA384
    )
}

// RFC3110: one length byte (or 0 + two bytes) before the exponent
fn rsa_components(raw: &[u8]) -> Result<(&[u8], &[u8]), DnssecError> {
    let bad = || DnssecError::Bogus("truncated RSA public key".to_string());

    let first = *raw.first().ok_or_else(bad)?;
    let (e_start, e_len) = if first == 0 {
        if raw.len() < 3 {
            return Err(bad());
        }
        (3usize, u16::from_be_bytes([raw[1], raw[2]]) as usize)
    } else {
        (1usize, first as usize)
    };

    if raw.len() < e_start + e_len {
        return Err(bad());
    }
    Ok((&raw[e_start..e_start + e_len], &raw[e_start + e_len..]))
}

/// Verify `signature` over `signed` with the public key carried by `key`.
/// A failure is a crypto failure, counted against the key-trap budget by the
/// caller.
pub fn verify_signature(key: &DNSKEY, signed: &[u8], sig: &[u8]) -> Result<(), DnssecError> {
    let crypto_failed = |_| DnssecError::Bogus("signature verification failed".to_string());

    match key.algorithm {
        Algorithm::RSASHA1 | Algorithm::RSASHA1NSEC3SHA1 => {
            let (e, n) = rsa_components(&key.public_key)?;
            RsaPublicKeyComponents { n, e }
                .verify(
                    &signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY,
                    signed,
                    sig,
                )
                .map_err(crypto_failed)
        }
        Algorithm::RSASHA256 => {
            let (e, n) = rsa_components(&key.public_key)?;
            RsaPublicKeyComponents { n, e }
                .verify(
                    &signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY,
                    signed,
                    sig,
                )
                .map_err(crypto_failed)
        }
        Algorithm::RSASHA512 => {
            let (e, n) = rsa_components(&key.public_key)?;
            RsaPublicKeyComponents { n, e }
                .verify(
                    &signature::RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY,
                    signed,
                    sig,
                )
                .map_err(crypto_failed)
        }
        Algorithm::ECDSAP256SHA256 => {
            // ring wants the uncompressed point: 0x04 | x | y
            let mut point = Vec::with_capacity(65);
            point.push(0x04);
            point.extend_from_slice(&key.public_key);
            UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_FIXED, &point)
                .verify(signed, sig)
                .map_err(crypto_failed)
        }
        Algorithm::ECDSAP384SHA384 => {
            let mut point = Vec::with_capacity(97);
            point.push(0x04);
            point.extend_from_slice(&key.public_key);
            UnparsedPublicKey::new(&signature::ECDSA_P384_SHA384_FIXED, &point)
                .verify(signed, sig)
                .map_err(crypto_failed)
        }
        Algorithm::ED25519 => UnparsedPublicKey::new(&signature::ED25519, &key.public_key)
            .verify(signed, sig)
            .map_err(crypto_failed),
        Algorithm::ED448 | Algorithm::Unknown(_) => Err(DnssecError::UnsupportedAlgorithm),
    }
}

/// The DS digest of a key: hash over canonical owner name + DNSKEY rdata
/// (RFC4034 §5.1.4). `None` when the digest type is unsupported.
pub fn ds_digest(owner: &DomainName, key: &DNSKEY, digest_type: &DigestType) -> Option<Vec<u8>> {
    let algorithm = match digest_type {
        DigestType::SHA1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
        DigestType::SHA256 => &digest::SHA256,
        DigestType::SHA384 => &digest::SHA384,
        DigestType::Unknown(_) => return None,
    };

    let mut input = owner.canonical_bytes();
    let mut wtr = crate::network_order::MessageWriter::canonical();
    use crate::network_order::ToNetworkOrder;
    key.to_network_bytes(&mut wtr).unwrap();
    input.extend_from_slice(wtr.as_slice());

    Some(digest::digest(algorithm, &input).as_ref().to_vec())
}

/// Does `key` at `owner` match `ds` by key tag, algorithm, digest type and
/// digest value?
pub fn ds_matches(owner: &DomainName, key: &DNSKEY, ds: &DS) -> bool {
    if ds.key_tag != key.key_tag() || ds.algorithm != key.algorithm {
        return false;
    }
    match ds_digest(owner, key, &ds.digest_type) {
        Some(digest) => digest == ds.digest,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ring::rand::SystemRandom;
    use ring::signature::{Ed25519KeyPair, KeyPair};

    fn generated_key() -> (Ed25519KeyPair, DNSKEY) {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();

        let dnskey = DNSKEY {
            flags: 257,
            protocol: 3,
            algorithm: Algorithm::ED25519,
            public_key: pair.public_key().as_ref().to_vec(),
        };
        (pair, dnskey)
    }

    #[test]
    fn ed25519_verifies() {
        let (pair, dnskey) = generated_key();
        let signed = b"sample signed data";
        let sig = pair.sign(signed);

        assert!(verify_signature(&dnskey, signed, sig.as_ref()).is_ok());
        assert!(verify_signature(&dnskey, b"tampered data", sig.as_ref()).is_err());
    }

    #[test]
    fn ed448_is_unsupported() {
        let dnskey = DNSKEY {
            flags: 256,
            protocol: 3,
            algorithm: Algorithm::ED448,
            public_key: vec![0; 57],
        };
        assert!(matches!(
            verify_signature(&dnskey, b"x", b"y"),
            Err(DnssecError::UnsupportedAlgorithm)
        ));
        assert!(!algorithm_supported(&Algorithm::ED448));
    }

    #[test]
    fn ds_digest_and_match() {
        let (_, dnskey) = generated_key();
        let owner: DomainName = "example.com".parse().unwrap();

        let ds = DS {
            key_tag: dnskey.key_tag(),
            algorithm: dnskey.algorithm,
            digest_type: DigestType::SHA256,
            digest: ds_digest(&owner, &dnskey, &DigestType::SHA256).unwrap(),
        };
        assert!(ds_matches(&owner, &dnskey, &ds));

        // the owner is part of the digest input
        let elsewhere: DomainName = "example.org".parse().unwrap();
        assert!(!ds_matches(&elsewhere, &dnskey, &ds));

        // unknown digest types never match
        let unsupported = DS {
            digest_type: DigestType::Unknown(9),
            ..ds
        };
        assert!(!ds_matches(&owner, &dnskey, &unsupported));
    }
}
