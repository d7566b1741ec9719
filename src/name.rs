//! Domain name utilities above the wire level: IDN normalization, hostname
//! validation, reverse-pointer derivation. Every failure is a value.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{DNSError, DNSResult};
use crate::rfc::domain::DomainName;

/// Convert a user-supplied name, possibly with Unicode labels, into its
/// A-label (ASCII) form.
///
/// ```
/// use recursor::name::normalize;
///
/// assert_eq!(normalize("münchen.de").unwrap().to_string(), "xn--mnchen-3ya.de.");
/// assert_eq!(normalize("Example.COM").unwrap().to_string(), "example.com.");
/// ```
pub fn normalize(name: &str) -> DNSResult<DomainName> {
    if name == "." {
        return Ok(DomainName::root());
    }
    let ascii = idna::domain_to_ascii(name)
        .map_err(|e| DNSError::DNS(format!("IDN conversion failed: {:?}", e)))?;
    DomainName::try_from(ascii.as_str())
}

/// Check a name against the letter-digit-hyphen host rules. `allow_underscore`
/// admits the leading underscore of service labels (`_sip._tcp`). A leftmost
/// `*` wildcard label is always accepted.
pub fn validate(name: &DomainName, allow_underscore: bool) -> DNSResult<()> {
    for (index, label) in name.labels().iter().enumerate() {
        if label.as_str() == "*" && index == 0 {
            continue;
        }

        let raw = label.as_bytes();
        if raw.starts_with(b"-") || raw.ends_with(b"-") {
            return Err(DNSError::DNS(format!("label '{}' starts or ends with a hyphen", label)));
        }

        for (i, byte) in raw.iter().enumerate() {
            let ok = byte.is_ascii_alphanumeric()
                || *byte == b'-'
                || (*byte == b'_' && i == 0 && allow_underscore);
            if !ok {
                return Err(DNSError::DNS(format!("invalid character in label '{}'", label)));
            }
        }
    }
    Ok(())
}

/// Case-insensitive name equality.
pub fn equals_ci(a: &DomainName, b: &DomainName) -> bool {
    a == b
}

pub fn is_subdomain(child: &DomainName, parent: &DomainName) -> bool {
    child.is_subdomain_of(parent)
}

/// The PTR owner name for an address.
///
/// ```
/// use recursor::name::reverse_ptr;
///
/// let name = reverse_ptr("192.0.2.7".parse().unwrap());
/// assert_eq!(name.to_string(), "7.2.0.192.in-addr.arpa.");
/// ```
pub fn reverse_ptr(ip: IpAddr) -> DomainName {
    let name = match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(v6) => {
            let mut labels = Vec::with_capacity(34);
            for byte in v6.octets().iter().rev() {
                labels.push(format!("{:x}", byte & 0xF));
                labels.push(format!("{:x}", byte >> 4));
            }
            labels.push("ip6.arpa".to_string());
            labels.join(".")
        }
    };
    // both shapes are well-formed by construction
    DomainName::try_from(name.as_str()).unwrap()
}

/// Parse a reverse-pointer owner back into an address.
///
/// Partial names are accepted: octets or nibbles not present fill the
/// high-order side of the address with zeroes, so a three-label IPv4 pointer
/// parses with a zero first octet.
pub fn parse_reverse_ptr(name: &DomainName) -> DNSResult<IpAddr> {
    let v4_root = DomainName::try_from("in-addr.arpa")?;
    let v6_root = DomainName::try_from("ip6.arpa")?;

    if name.is_subdomain_of(&v4_root) && name != &v4_root {
        let labels = &name.labels()[..name.label_count() - 2];
        if labels.len() > 4 {
            return Err(DNSError::DNS(format!("'{}' has too many labels for an IPv4 pointer", name)));
        }

        // the first label is the least significant octet
        let mut octets = [0u8; 4];
        for (index, label) in labels.iter().enumerate() {
            let value = label
                .parse::<u8>()
                .map_err(|_| DNSError::DNS(format!("'{}' is not an IPv4 octet", label)))?;
            octets[3 - index] = value;
        }
        return Ok(IpAddr::V4(Ipv4Addr::from(octets)));
    }

    if name.is_subdomain_of(&v6_root) && name != &v6_root {
        let labels = &name.labels()[..name.label_count() - 2];
        if labels.len() > 32 {
            return Err(DNSError::DNS(format!("'{}' has too many labels for an IPv6 pointer", name)));
        }

        // the first label is the least significant nibble
        let mut address = 0u128;
        for (index, label) in labels.iter().enumerate() {
            if label.len() != 1 {
                return Err(DNSError::DNS(format!("'{}' is not a nibble", label)));
            }
            let value = u8::from_str_radix(label, 16)
                .map_err(|_| DNSError::DNS(format!("'{}' is not a nibble", label)))?;
            address |= (value as u128) << (4 * index);
        }
        return Ok(IpAddr::V6(Ipv6Addr::from(address)));
    }

    Err(DNSError::DNS(format!("'{}' is not a reverse pointer name", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(normalize("bücher.example").unwrap().to_string(), "xn--bcher-kva.example.");
        assert!(normalize("").is_err());
    }

    #[test]
    fn validation() {
        let plain: DomainName = "www.example-1.com".parse().unwrap();
        assert!(validate(&plain, false).is_ok());

        let service: DomainName = "_sip._tcp.example.com".parse().unwrap();
        assert!(validate(&service, false).is_err());
        assert!(validate(&service, true).is_ok());

        let wildcard: DomainName = "*.example.com".parse().unwrap();
        assert!(validate(&wildcard, false).is_ok());

        let hyphen: DomainName = "-bad.example.com".parse().unwrap();
        assert!(validate(&hyphen, false).is_err());
    }

    #[test]
    fn equality_laws() {
        let a: DomainName = "A.example.COM".parse().unwrap();
        let b: DomainName = "a.EXAMPLE.com".parse().unwrap();
        let c: DomainName = "a.example.com".parse().unwrap();

        // reflexive, symmetric, transitive
        assert!(equals_ci(&a, &a));
        assert!(equals_ci(&a, &b) && equals_ci(&b, &a));
        assert!(equals_ci(&a, &b) && equals_ci(&b, &c) && equals_ci(&a, &c));
    }

    #[test]
    fn v4_pointers() {
        let name = reverse_ptr("198.51.100.7".parse().unwrap());
        assert_eq!(name.to_string(), "7.100.51.198.in-addr.arpa.");
        assert_eq!(parse_reverse_ptr(&name).unwrap(), "198.51.100.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn v4_partial_pads_leading_octets() {
        // three labels: the most significant octet is zero
        let name: DomainName = "7.100.51.in-addr.arpa".parse().unwrap();
        assert_eq!(parse_reverse_ptr(&name).unwrap(), "0.51.100.7".parse::<IpAddr>().unwrap());

        let too_many: DomainName = "1.2.3.4.5.in-addr.arpa".parse().unwrap();
        assert!(parse_reverse_ptr(&too_many).is_err());
    }

    #[test]
    fn v6_pointers() {
        let ip: IpAddr = "2001:db8::7".parse().unwrap();
        let name = reverse_ptr(ip);
        assert!(name.to_string().ends_with("ip6.arpa."));
        assert_eq!(name.label_count(), 34);
        assert_eq!(parse_reverse_ptr(&name).unwrap(), ip);
    }

    #[test]
    fn v6_partial_is_zero_filled() {
        // only the lowest four nibbles given
        let name: DomainName = "7.0.0.0.ip6.arpa".parse().unwrap();
        assert_eq!(parse_reverse_ptr(&name).unwrap(), "::7".parse::<IpAddr>().unwrap());

        let bad: DomainName = "g.ip6.arpa".parse().unwrap();
        assert!(parse_reverse_ptr(&bad).is_err());
    }

    #[test]
    fn not_a_pointer() {
        let name: DomainName = "www.example.com".parse().unwrap();
        assert!(parse_reverse_ptr(&name).is_err());
    }
}
