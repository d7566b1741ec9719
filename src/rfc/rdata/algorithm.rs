//! DNSSEC algorithm and digest numbers:
//! https://www.iana.org/assignments/dns-sec-alg-numbers/dns-sec-alg-numbers.xhtml
use std::fmt;

/// Signing algorithms. Codes we cannot verify still need representing: an
/// unsupported algorithm downgrades a chain to Insecure instead of breaking
/// the decode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[default]
    RSASHA1, // 5	[RFC3110]
    RSASHA1NSEC3SHA1,  // 7	[RFC5155]
    RSASHA256,         // 8	[RFC5702]
    RSASHA512,         // 10	[RFC5702]
    ECDSAP256SHA256,   // 13	[RFC6605]
    ECDSAP384SHA384,   // 14	[RFC6605]
    ED25519,           // 15	[RFC8080]
    ED448,             // 16	[RFC8080]
    Unknown(u8),
}

impl Algorithm {
    pub fn code(&self) -> u8 {
        match self {
            Algorithm::RSASHA1 => 5,
            Algorithm::RSASHA1NSEC3SHA1 => 7,
            Algorithm::RSASHA256 => 8,
            Algorithm::RSASHA512 => 10,
            Algorithm::ECDSAP256SHA256 => 13,
            Algorithm::ECDSAP384SHA384 => 14,
            Algorithm::ED25519 => 15,
            Algorithm::ED448 => 16,
            Algorithm::Unknown(code) => *code,
        }
    }
}

impl From<u8> for Algorithm {
    fn from(code: u8) -> Self {
        match code {
            5 => Algorithm::RSASHA1,
            7 => Algorithm::RSASHA1NSEC3SHA1,
            8 => Algorithm::RSASHA256,
            10 => Algorithm::RSASHA512,
            13 => Algorithm::ECDSAP256SHA256,
            14 => Algorithm::ECDSAP384SHA384,
            15 => Algorithm::ED25519,
            16 => Algorithm::ED448,
            _ => Algorithm::Unknown(code),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Unknown(code) => write!(f, "ALG{}", code),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// DS digest types: https://www.iana.org/assignments/ds-rr-types/ds-rr-types.xhtml
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestType {
    #[default]
    SHA1, // 1	[RFC3658]
    SHA256, // 2	[RFC4509]
    SHA384, // 4	[RFC6605]
    Unknown(u8),
}

impl DigestType {
    pub fn code(&self) -> u8 {
        match self {
            DigestType::SHA1 => 1,
            DigestType::SHA256 => 2,
            DigestType::SHA384 => 4,
            DigestType::Unknown(code) => *code,
        }
    }
}

impl From<u8> for DigestType {
    fn from(code: u8) -> Self {
        match code {
            1 => DigestType::SHA1,
            2 => DigestType::SHA256,
            4 => DigestType::SHA384,
            _ => DigestType::Unknown(code),
        }
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestType::Unknown(code) => write!(f, "DIGEST{}", code),
            _ => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for code in 0..=255u8 {
            assert_eq!(Algorithm::from(code).code(), code);
            assert_eq!(DigestType::from(code).code(), code);
        }
    }
}
