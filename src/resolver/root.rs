//! The root nameservers, https://www.iana.org/domains/root/servers
//!
//! Compiled-in so a resolver works without any configuration; callers can
//! swap in their own set (or freshly primed addresses) at construction.
use crate::resolver::ns::NameServer;
use crate::rfc::domain::DomainName;

const ROOT_SERVERS: &[(&str, &str, &str)] = &[
    ("a.root-servers.net", "198.41.0.4", "2001:503:ba3e::2:30"),
    ("b.root-servers.net", "170.247.170.2", "2801:1b8:10::b"),
    ("c.root-servers.net", "192.33.4.12", "2001:500:2::c"),
    ("d.root-servers.net", "199.7.91.13", "2001:500:2d::d"),
    ("e.root-servers.net", "192.203.230.10", "2001:500:a8::e"),
    ("f.root-servers.net", "192.5.5.241", "2001:500:2f::f"),
    ("g.root-servers.net", "192.112.36.4", "2001:500:12::d0d"),
    ("h.root-servers.net", "198.97.190.53", "2001:500:1::53"),
    ("i.root-servers.net", "192.36.148.17", "2001:7fe::53"),
    ("j.root-servers.net", "192.58.128.30", "2001:503:c27::2:30"),
    ("k.root-servers.net", "193.0.14.129", "2001:7fd::1"),
    ("l.root-servers.net", "199.7.83.42", "2001:500:9f::42"),
    ("m.root-servers.net", "202.12.27.33", "2001:dc3::35"),
];

/// One entry per address, v4 and v6.
pub fn root_servers() -> Vec<NameServer> {
    let mut servers = Vec::with_capacity(ROOT_SERVERS.len() * 2);
    for (host, v4, v6) in ROOT_SERVERS {
        let host: DomainName = host.parse().unwrap();
        servers.push(NameServer::resolved(host.clone(), v4.parse().unwrap()));
        servers.push(NameServer::resolved(host, v6.parse().unwrap()));
    }
    servers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_roots_both_families() {
        let servers = root_servers();
        assert_eq!(servers.len(), 26);
        assert!(servers.iter().all(|ns| ns.is_resolved()));
        assert_eq!(
            servers.iter().filter(|ns| ns.addr.unwrap().is_ipv6()).count(),
            13
        );
    }
}
