//! A dedicated error for all possible errors in DNS resolution: I/O, wire
//! format violations, resolution failures, DNSSEC verdicts.
//!
//! All errors are plain values; no error is ever used for control flow inside
//! the resolver loop, which is a state machine returning `DNSResult`.
use std::fmt;
use std::io;
use std::str;

/// Wire format violations detected by the codec. The codec never partially
/// updates a caller-visible message: any of these aborts the whole decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Catch-all for structural violations: counts not matching sections,
    /// rdata not consuming its declared rdlength, truncated buffers.
    MalformedMessage,
    /// An assembled domain name exceeds 255 octets.
    NameTooLong,
    /// A label exceeds 63 octets.
    LabelTooLong,
    /// More than 127 labels consumed while following compression pointers.
    PointerLoop,
    /// A compression pointer referring to an offset at or past itself.
    PointerForward,
    /// Persistence framing: a length prefix announcing more than 4 length bytes.
    InvalidLengthPrefix,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::MalformedMessage => write!(f, "malformed DNS message"),
            CodecError::NameTooLong => write!(f, "domain name longer than 255 octets"),
            CodecError::LabelTooLong => write!(f, "label longer than 63 octets"),
            CodecError::PointerLoop => write!(f, "compression pointer loop"),
            CodecError::PointerForward => write!(f, "compression pointer not pointing backwards"),
            CodecError::InvalidLengthPrefix => write!(f, "invalid length prefix"),
        }
    }
}

/// Why the resolver gave up on the outermost query, or what the authoritative
/// answer amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Upstream or internal server failure, with a diagnostic reason.
    ServFail(String),
    /// The queried name does not exist (authenticated or not).
    NXDomain,
    /// The name exists but holds no record of the queried type.
    NoData,
    /// The authority refused the query.
    Refused,
    /// All attempts against the selected authorities timed out.
    Timeout,
    /// More than `MAX_REFERRAL_DEPTH` referrals followed.
    ReferralDepthExceeded,
    /// CNAME/DNAME chain longer than `MAX_CNAME_HOPS` or looping.
    CnameLoop,
    /// Glue resolution nested deeper than `MAX_GLUE_DEPTH`.
    GlueExhausted,
    /// Every known nameserver for the zone was tried and failed.
    NoReachableAuthorities,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::ServFail(reason) => write!(f, "server failure: {}", reason),
            ResolveError::NXDomain => write!(f, "no such domain"),
            ResolveError::NoData => write!(f, "no data for the queried type"),
            ResolveError::Refused => write!(f, "query refused"),
            ResolveError::Timeout => write!(f, "query timed out"),
            ResolveError::ReferralDepthExceeded => write!(f, "referral depth exceeded"),
            ResolveError::CnameLoop => write!(f, "CNAME loop or chain too long"),
            ResolveError::GlueExhausted => write!(f, "glue resolution depth exceeded"),
            ResolveError::NoReachableAuthorities => write!(f, "no reachable authorities"),
        }
    }
}

/// DNSSEC validation failures. `Bogus` carries the broken link; the other
/// variants are the precise reasons the validator feeds into `Bogus` or into
/// the Insecure downgrade decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnssecError {
    Bogus(String),
    /// One of the key-trap budgets was exhausted while validating a response.
    BudgetExhausted,
    UnsupportedAlgorithm,
    SignatureExpired,
    SignatureNotYetValid,
    /// No DS record at a zone cut where the chain required one.
    MissingDS,
    /// The DNSKEY RRset for a zone could not be obtained.
    MissingDNSKEY,
    /// No DNSKEY matched the RRSIG's key tag and algorithm.
    KeyTagMismatch,
}

impl fmt::Display for DnssecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnssecError::Bogus(reason) => write!(f, "bogus: {}", reason),
            DnssecError::BudgetExhausted => write!(f, "validation budget exhausted"),
            DnssecError::UnsupportedAlgorithm => write!(f, "unsupported DNSSEC algorithm"),
            DnssecError::SignatureExpired => write!(f, "signature expired"),
            DnssecError::SignatureNotYetValid => write!(f, "signature not yet valid"),
            DnssecError::MissingDS => write!(f, "missing DS record"),
            DnssecError::MissingDNSKEY => write!(f, "missing DNSKEY record"),
            DnssecError::KeyTagMismatch => write!(f, "no DNSKEY matching key tag"),
        }
    }
}

#[derive(Debug)]
pub enum DNSError {
    Io(io::Error),
    FromUtf8(std::string::FromUtf8Error),
    Utf8(str::Utf8Error),
    LoggerError(log::SetLoggerError),
    Codec(CodecError),
    Resolve(ResolveError),
    Dnssec(DnssecError),
    DNS(String),
}

impl DNSError {
    // Helper function to create a new DNS error from a string
    pub fn new(s: &str) -> Self {
        DNSError::DNS(String::from(s))
    }
}

/// A specific custom `Result` for all functions
pub type DNSResult<T> = Result<T, DNSError>;

impl fmt::Display for DNSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DNSError::Io(e) => write!(f, "I/O error: {}", e),
            DNSError::FromUtf8(e) => write!(f, "UTF-8 conversion error: {}", e),
            DNSError::Utf8(e) => write!(f, "UTF-8 error: {}", e),
            DNSError::LoggerError(e) => write!(f, "logger error: {}", e),
            DNSError::Codec(e) => write!(f, "{}", e),
            DNSError::Resolve(e) => write!(f, "{}", e),
            DNSError::Dnssec(e) => write!(f, "{}", e),
            DNSError::DNS(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for DNSError {}

// All conversions from internal errors to DNSError
impl From<io::Error> for DNSError {
    fn from(err: io::Error) -> Self {
        DNSError::Io(err)
    }
}

impl From<String> for DNSError {
    fn from(err: String) -> Self {
        DNSError::DNS(err)
    }
}

impl From<std::string::FromUtf8Error> for DNSError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DNSError::FromUtf8(err)
    }
}

impl From<str::Utf8Error> for DNSError {
    fn from(err: str::Utf8Error) -> Self {
        DNSError::Utf8(err)
    }
}

impl From<log::SetLoggerError> for DNSError {
    fn from(err: log::SetLoggerError) -> Self {
        DNSError::LoggerError(err)
    }
}

impl From<CodecError> for DNSError {
    fn from(err: CodecError) -> Self {
        DNSError::Codec(err)
    }
}

impl From<ResolveError> for DNSError {
    fn from(err: ResolveError) -> Self {
        DNSError::Resolve(err)
    }
}

impl From<DnssecError> for DNSError {
    fn from(err: DnssecError) -> Self {
        DNSError::Dnssec(err)
    }
}
