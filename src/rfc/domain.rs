//! Domain names: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4
//!
//! Labels are stored in A-label (ASCII) form without the trailing root label;
//! the root name is the empty label sequence. Comparison is ASCII
//! case-insensitive everywhere; canonical output (RFC4034 §6) lowercases.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{CodecError, DNSError, DNSResult};
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::util::is_pointer;

// hard limits from RFC1035 §2.3.4 / §3.1
pub const MAX_LABEL_LENGTH: usize = 63;
pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_LABEL_COUNT: usize = 127;

#[derive(Debug, Default, Clone, Eq)]
pub struct DomainName {
    labels: Vec<String>,
}

impl DomainName {
    /// The root name `.`
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn from_labels(labels: Vec<String>) -> DNSResult<Self> {
        let dn = Self { labels };
        dn.check_limits()?;
        Ok(dn)
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Length on the wire, including length octets and the final zero.
    pub fn encoded_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    fn check_limits(&self) -> DNSResult<()> {
        for label in &self.labels {
            if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
                return Err(CodecError::LabelTooLong.into());
            }
        }
        if self.encoded_len() > MAX_NAME_LENGTH {
            return Err(CodecError::NameTooLong.into());
        }
        Ok(())
    }

    /// The name one label up, `None` for the root.
    pub fn parent(&self) -> Option<DomainName> {
        if self.is_root() {
            return None;
        }
        Some(DomainName {
            labels: self.labels[1..].to_vec(),
        })
    }

    /// True when `self` is `parent` or lies underneath it.
    ///
    /// ```
    /// use recursor::rfc::domain::DomainName;
    ///
    /// let child: DomainName = "www.example.com".parse().unwrap();
    /// let parent: DomainName = "EXAMPLE.com".parse().unwrap();
    /// let root = DomainName::root();
    /// assert!(child.is_subdomain_of(&parent));
    /// assert!(child.is_subdomain_of(&root));
    /// assert!(!parent.is_subdomain_of(&child));
    /// ```
    pub fn is_subdomain_of(&self, parent: &DomainName) -> bool {
        if parent.labels.len() > self.labels.len() {
            return false;
        }
        let offset = self.labels.len() - parent.labels.len();
        self.labels[offset..]
            .iter()
            .zip(parent.labels.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// The suffix of `self` holding `count` labels (`count` = 0 is the root).
    pub fn suffix(&self, count: usize) -> DomainName {
        let count = count.min(self.labels.len());
        DomainName {
            labels: self.labels[self.labels.len() - count..].to_vec(),
        }
    }

    /// DNAME substitution per RFC6672 §2.2: the part of `self` below `owner`
    /// is grafted onto `target`. Fails outside the owner's subtree and when
    /// the substituted name busts the length limit.
    pub fn substitute(&self, owner: &DomainName, target: &DomainName) -> DNSResult<DomainName> {
        if !self.is_subdomain_of(owner) {
            return Err(DNSError::new("name not in the DNAME owner subtree"));
        }
        let keep = self.labels.len() - owner.labels.len();
        let mut labels = self.labels[..keep].to_vec();
        labels.extend(target.labels.iter().cloned());

        let substituted = DomainName { labels };
        substituted.check_limits()?;
        Ok(substituted)
    }

    /// Canonical ordering per RFC4034 §6.1: compare label sequences from the
    /// rightmost label leftwards, lowercased, as octet strings.
    pub fn canonical_cmp(&self, other: &DomainName) -> Ordering {
        let mine = self.labels.iter().rev();
        let theirs = other.labels.iter().rev();

        for (a, b) in mine.zip(theirs) {
            let ord = a
                .bytes()
                .map(|x| x.to_ascii_lowercase())
                .cmp(b.bytes().map(|x| x.to_ascii_lowercase()));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.labels.len().cmp(&other.labels.len())
    }

    /// Uncompressed lowercase wire form, the owner-name input of DS digests
    /// and signature computations.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.encoded_len());
        for label in &self.labels {
            raw.push(label.len() as u8);
            raw.extend(label.bytes().map(|x| x.to_ascii_lowercase()));
        }
        raw.push(0);
        raw
    }

    fn write_label(wtr: &mut MessageWriter, label: &str) -> std::io::Result<usize> {
        wtr.write_u8(label.len() as u8)?;
        if wtr.is_canonical() {
            for byte in label.bytes() {
                wtr.write_u8(byte.to_ascii_lowercase())?;
            }
        } else {
            wtr.write_all(label.as_bytes());
        }
        Ok(label.len() + 1)
    }

    fn lowercased(labels: &[String]) -> Vec<String> {
        labels.iter().map(|l| l.to_ascii_lowercase()).collect()
    }
}

impl ToNetworkOrder for DomainName {
    /// Emit the name label by label. When the writer carries a compression
    /// map, every suffix already written is replaced by a pointer to its
    /// first occurrence; new suffixes are remembered as they go out.
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        let mut length = 0usize;

        if wtr.compression_permitted() {
            for index in 0..self.labels.len() {
                let suffix = Self::lowercased(&self.labels[index..]);
                if let Some(offset) = wtr.lookup_name(&suffix) {
                    // 0b11 prefix + 14-bit offset of the earlier occurrence
                    wtr.write_u16(0b1100_0000_0000_0000 | offset)?;
                    return Ok(length + 2);
                }
                wtr.remember_name(suffix, wtr.position());
                length += Self::write_label(wtr, &self.labels[index])?;
            }
        } else {
            for label in &self.labels {
                length += Self::write_label(wtr, label)?;
            }
        }

        // the sentinel root label
        wtr.write_u8(0)?;
        Ok(length + 1)
    }
}

impl FromNetworkOrder for DomainName {
    /// Follow labels and compression pointers. Guards:
    /// - a pointer must land strictly before its own position;
    /// - at most 127 labels per name;
    /// - the assembled name stays within 255 octets.
    fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
        let whole = *rdr.get_ref();
        let mut labels = Vec::new();

        // index walks the message; cursor advances only until the first pointer
        let mut index = rdr.position() as usize;
        let mut followed_pointer = false;
        let mut encoded_len = 1usize;

        loop {
            let prefix = *whole.get(index).ok_or(CodecError::MalformedMessage)?;

            if prefix == 0 {
                if !followed_pointer {
                    rdr.set_position(index as u64 + 1);
                }
                break;
            }

            if is_pointer(prefix) {
                let low = *whole.get(index + 1).ok_or(CodecError::MalformedMessage)?;
                let target = (((prefix & 0b0011_1111) as usize) << 8) | low as usize;

                // only backward references keep the walk finite
                if target >= index {
                    return Err(CodecError::PointerForward.into());
                }
                if !followed_pointer {
                    rdr.set_position(index as u64 + 2);
                    followed_pointer = true;
                }
                index = target;
                continue;
            }

            // the 0b01/0b10 prefixes are reserved
            if prefix > MAX_LABEL_LENGTH as u8 {
                return Err(CodecError::LabelTooLong.into());
            }

            let size = prefix as usize;
            let raw = whole
                .get(index + 1..index + 1 + size)
                .ok_or(CodecError::MalformedMessage)?;
            labels.push(std::str::from_utf8(raw)?.to_string());

            encoded_len += size + 1;
            if encoded_len > MAX_NAME_LENGTH {
                return Err(CodecError::NameTooLong.into());
            }
            if labels.len() > MAX_LABEL_COUNT {
                return Err(CodecError::PointerLoop.into());
            }

            index += size + 1;
        }

        self.labels = labels;
        Ok(())
    }
}

/// ```
/// use recursor::rfc::domain::DomainName;
///
/// let dn = DomainName::try_from("www.google.com").unwrap();
/// assert_eq!(dn.to_string(), "www.google.com.");
///
/// let dn = DomainName::try_from("www.google.ie.").unwrap();
/// assert_eq!(dn.to_string(), "www.google.ie.");
///
/// let dn = DomainName::try_from(".").unwrap();
/// assert!(dn.is_root());
///
/// assert!(DomainName::try_from("").is_err());
/// ```
impl TryFrom<&str> for DomainName {
    type Error = DNSError;

    fn try_from(domain: &str) -> Result<Self, Self::Error> {
        // safeguard
        if domain.is_empty() {
            return Err(DNSError::new("empty domain name"));
        }

        // handle case for root domain
        let labels: Vec<String> = if domain == "." {
            Vec::new()
        } else {
            domain
                .trim_end_matches('.')
                .split('.')
                .map(|x| x.to_string())
                .collect()
        };

        // an inner empty label means ".." was present
        if labels.iter().any(|l| l.is_empty()) {
            return Err(DNSError::new("empty label in domain name"));
        }

        Self::from_labels(labels)
    }
}

impl FromStr for DomainName {
    type Err = DNSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DomainName::try_from(s)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        for label in &self.labels {
            write!(f, "{}.", label)?;
        }
        Ok(())
    }
}

// names compare case-insensitively
impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Hash for DomainName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in &self.labels {
            for byte in label.bytes() {
                state.write_u8(byte.to_ascii_lowercase());
            }
            state.write_u8(0);
        }
    }
}
