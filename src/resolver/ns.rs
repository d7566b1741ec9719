//! Stateful cursor over the nameservers of one referral: randomized order,
//! batching of resolved endpoints, per-server failure accounting and
//! suppression, and a cumulative retry budget for the whole authority set.
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use log::warn;
use rand::seq::SliceRandom;

use crate::rfc::domain::DomainName;

/// No more than this many servers of a referral are ever considered.
pub const MAX_NS_PER_REFERRAL: usize = 8;
/// Total dispatch attempts against one authority set.
pub const MAX_RETRIES_PER_AUTHORITY: usize = 12;
/// A server with this many failures is never selected again in this frame.
pub const MAX_FAILURES_PER_SERVER: u32 = 3;

pub const DNS_PORT: u16 = 53;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameServer {
    pub host: DomainName,
    /// `None` until a glue lookup resolves the endpoint.
    pub addr: Option<SocketAddr>,
}

impl NameServer {
    pub fn unresolved(host: DomainName) -> Self {
        Self { host, addr: None }
    }

    pub fn resolved(host: DomainName, ip: IpAddr) -> Self {
        Self {
            host,
            addr: Some(SocketAddr::new(ip, DNS_PORT)),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.addr.is_some()
    }

    fn is_ipv6(&self) -> bool {
        matches!(self.addr, Some(addr) if addr.is_ipv6())
    }
}

impl fmt::Display for NameServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr {
            Some(addr) => write!(f, "{}({})", self.host, addr),
            None => write!(f, "{}(unresolved)", self.host),
        }
    }
}

#[derive(Debug, Default, Clone)]
struct FailureState {
    timeout: u32,
    bogus: u32,
    insecure: u32,
}

impl FailureState {
    fn total(&self) -> u32 {
        self.timeout + self.bogus + self.insecure
    }
}

/// What the resolver gets out of one `select_next` call.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    /// Consecutive servers with resolved endpoints, dispatched concurrently.
    Batch(Vec<NameServer>),
    /// A server that needs a glue lookup first; the cursor did not advance.
    Unresolved(NameServer),
}

#[derive(Debug)]
pub struct NameServerIterator {
    // immutable randomized ordering, capped at MAX_NS_PER_REFERRAL
    servers: Vec<NameServer>,
    index: usize,
    // where the last selection started, for rewinding
    current: usize,
    failures: HashMap<DomainName, FailureState>,
    retries: usize,
    batch_limit: usize,
    warned_budget: bool,
}

impl NameServerIterator {
    pub fn new(ns_set: &[NameServer], prefer_ipv6: bool, batch_limit: usize) -> Self {
        let mut servers = ns_set.to_vec();
        servers.shuffle(&mut rand::thread_rng());
        servers.truncate(MAX_NS_PER_REFERRAL);

        // soft preference: a stable sort keeps the random order within each
        // address family, so attackers cannot predict the first target
        if prefer_ipv6 {
            servers.sort_by_key(|ns| !ns.is_ipv6());
        }

        Self {
            servers,
            index: 0,
            current: 0,
            failures: HashMap::new(),
            retries: 0,
            batch_limit: batch_limit.max(1),
            warned_budget: false,
        }
    }

    pub fn has_more(&self) -> bool {
        self.retries < MAX_RETRIES_PER_AUTHORITY && self.index < self.servers.len()
    }

    fn suppressed(&self, ns: &NameServer) -> bool {
        self.failures
            .get(&ns.host)
            .map(|f| f.total() >= MAX_FAILURES_PER_SERVER)
            .unwrap_or(false)
    }

    /// Walk forward from the cursor, skipping suppressed servers. Resolved
    /// servers accumulate into a batch; the first unresolved candidate is
    /// handed back alone so the resolver can hunt glue for it.
    pub fn select_next(&mut self) -> Option<Selection> {
        if !self.has_more() {
            return None;
        }

        let mut batch = Vec::new();
        let mut probe = self.index;

        while probe < self.servers.len() && batch.len() < self.batch_limit {
            let ns = &self.servers[probe];

            if self.suppressed(ns) {
                probe += 1;
                continue;
            }

            if !ns.is_resolved() {
                if batch.is_empty() {
                    // do not advance: once resolved, the same server is
                    // selected again
                    self.current = self.index;
                    self.index = probe;
                    return Some(Selection::Unresolved(ns.clone()));
                }
                break;
            }

            batch.push(ns.clone());
            probe += 1;
        }

        if batch.is_empty() {
            return None;
        }

        // the cursor moves past the whole batch
        self.current = self.index;
        self.index = probe;
        Some(Selection::Batch(batch))
    }

    /// Patch in the endpoint of a server once its glue lookup succeeded.
    pub fn resolve_endpoint(&mut self, host: &DomainName, ip: IpAddr) {
        for ns in &mut self.servers {
            if &ns.host == host && ns.addr.is_none() {
                ns.addr = Some(SocketAddr::new(ip, DNS_PORT));
            }
        }
    }

    pub fn record_timeout(&mut self, ns: &NameServer) {
        self.record(ns, |f| f.timeout += 1);
    }

    pub fn record_bogus(&mut self, ns: &NameServer) {
        self.record(ns, |f| f.bogus += 1);
    }

    pub fn record_insecure(&mut self, ns: &NameServer) {
        self.record(ns, |f| f.insecure += 1);
    }

    fn record(&mut self, ns: &NameServer, bump: impl FnOnce(&mut FailureState)) {
        let state = self.failures.entry(ns.host.clone()).or_default();
        bump(state);
        if state.total() == MAX_FAILURES_PER_SERVER {
            warn!("nameserver {} suppressed after {} failures", ns, MAX_FAILURES_PER_SERVER);
        }

        self.retries += 1;
        if !self.warned_budget && self.retries * 4 >= MAX_RETRIES_PER_AUTHORITY * 3 {
            warn!(
                "retry budget for this authority set is at {}/{}",
                self.retries, MAX_RETRIES_PER_AUTHORITY
            );
            self.warned_budget = true;
        }
    }

    /// Rewind to the start of the last selection; used when the same server
    /// is asked again with QNAME minimization toggled off.
    pub fn rewind_to_current(&mut self) {
        self.index = self.current;
    }

    pub fn move_next(&mut self) {
        self.index += 1;
    }

    pub fn retries(&self) -> usize {
        self.retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers(resolved: usize, unresolved: usize) -> Vec<NameServer> {
        let mut set = Vec::new();
        for i in 0..resolved {
            set.push(NameServer::resolved(
                format!("ns{}.example.com", i).parse().unwrap(),
                format!("192.0.2.{}", i + 1).parse().unwrap(),
            ));
        }
        for i in 0..unresolved {
            set.push(NameServer::unresolved(
                format!("lame{}.example.net", i).parse().unwrap(),
            ));
        }
        set
    }

    #[test]
    fn batches_are_capped() {
        let mut it = NameServerIterator::new(&servers(5, 0), false, 2);

        match it.select_next().unwrap() {
            Selection::Batch(batch) => assert_eq!(batch.len(), 2),
            other => panic!("unexpected selection {:?}", other),
        }
        // the cursor advanced past the whole batch
        match it.select_next().unwrap() {
            Selection::Batch(batch) => assert_eq!(batch.len(), 2),
            other => panic!("unexpected selection {:?}", other),
        }
    }

    #[test]
    fn unresolved_does_not_advance() {
        let mut it = NameServerIterator::new(&servers(0, 1), false, 2);

        let first = it.select_next().unwrap();
        let second = it.select_next().unwrap();
        assert_eq!(first, second);
        assert!(matches!(first, Selection::Unresolved(_)));

        // once resolved, the same server comes back as a batch
        let host: DomainName = "lame0.example.net".parse().unwrap();
        it.resolve_endpoint(&host, "192.0.2.77".parse().unwrap());
        match it.select_next().unwrap() {
            Selection::Batch(batch) => {
                assert_eq!(batch.len(), 1);
                assert!(batch[0].is_resolved());
            }
            other => panic!("unexpected selection {:?}", other),
        }
    }

    #[test]
    fn failed_server_is_suppressed() {
        let set = servers(2, 0);
        let mut it = NameServerIterator::new(&set, false, 1);

        let first = match it.select_next().unwrap() {
            Selection::Batch(batch) => batch[0].clone(),
            other => panic!("unexpected selection {:?}", other),
        };

        for _ in 0..MAX_FAILURES_PER_SERVER {
            it.record_timeout(&first);
        }
        it.rewind_to_current();

        // the suppressed server is skipped forever
        while let Some(Selection::Batch(batch)) = it.select_next() {
            assert!(batch.iter().all(|ns| ns.host != first.host));
        }
    }

    #[test]
    fn retry_budget_exhausts_iteration() {
        let set = servers(1, 0);
        let mut it = NameServerIterator::new(&set, false, 1);

        let ns = set[0].clone();
        let mut dispatches = 0;
        loop {
            it.rewind_to_current();
            match it.select_next() {
                Some(Selection::Batch(_)) => {
                    dispatches += 1;
                    // alternate failure classes, the budget counts them all
                    if dispatches % 2 == 0 {
                        it.record_timeout(&ns);
                    } else {
                        it.record_insecure(&ns);
                    }
                    // reset the per-server counters so only the cumulative
                    // budget can stop the loop
                    it.failures.clear();
                }
                _ => break,
            }
        }
        assert_eq!(dispatches, MAX_RETRIES_PER_AUTHORITY);
    }

    #[test]
    fn ipv6_preference_is_stable() {
        let mut set = servers(3, 0);
        set.push(NameServer::resolved(
            "v6.example.com".parse().unwrap(),
            "2001:db8::1".parse().unwrap(),
        ));

        let it = NameServerIterator::new(&set, true, 4);
        assert!(it.servers[0].is_ipv6());
    }
}
