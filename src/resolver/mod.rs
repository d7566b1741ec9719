//! The iterative resolver: walks the delegation tree from the root hints,
//! hunts glue for unresolved nameservers, minimizes query names, chases
//! CNAME/DNAME chains, and hands authoritative responses to the DNSSEC
//! validator before assembling the answer returned to the caller.
pub mod cache;
pub mod dispatcher;
pub mod ns;
pub mod root;

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace, warn};
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::dnssec::trust::TrustAnchors;
use crate::dnssec::{ChainFetcher, TrustState, Validator};
use crate::error::{DNSResult, DnssecError, ResolveError};
use crate::rfc::domain::DomainName;
use crate::rfc::flags::PacketType;
use crate::rfc::message::Message;
use crate::rfc::opt::{ClientSubnet, Edns, EdnsOption, DEFAULT_UDP_PAYLOAD_SIZE};
use crate::rfc::qtype::QType;
use crate::rfc::question::Question;
use crate::rfc::rdata::RData;
use crate::rfc::resource_record::ResourceRecord;
use crate::rfc::response_code::ResponseCode;
use crate::rfc::rrset::RRSet;

use cache::{Cache, NullCache};
use dispatcher::{cancel_pair, DispatchError, DispatchOptions, Dispatcher};
use ns::{NameServer, NameServerIterator, Selection};

/// Referrals followed per outermost query before giving up.
pub const MAX_REFERRAL_DEPTH: usize = 30;
/// CNAME/DNAME hops before declaring a loop.
pub const MAX_CNAME_HOPS: usize = 16;
/// Nesting of glue lookups; exceeding abandons the NS branch, not the query.
pub const MAX_GLUE_DEPTH: usize = 4;
/// In-flight dispatches per frame.
pub const CONCURRENCY: u16 = 2;

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub prefer_ipv6: bool,
    pub dnssec_validation: bool,
    pub qname_minimization: bool,
    /// Fall back to the full QNAME on a negative minimized probe; disabling
    /// this walks past empty non-terminals label by label instead.
    pub qname_min_fallback: bool,
    pub concurrency: u16,
    pub retries: u16,
    pub timeout_ms: u32,
    pub udp_payload_size: u16,
    pub ecs: Option<ClientSubnet>,
    pub minimal_response: bool,
    /// Resolve missing NS addresses for both families concurrently.
    pub async_ns_resolution: bool,
    /// Every raw upstream response is mirrored here when set.
    pub raw_responses_sink: Option<mpsc::UnboundedSender<Message>>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            prefer_ipv6: false,
            dnssec_validation: false,
            qname_minimization: true,
            qname_min_fallback: true,
            concurrency: CONCURRENCY,
            retries: 2,
            timeout_ms: 3000,
            udp_payload_size: DEFAULT_UDP_PAYLOAD_SIZE,
            ecs: None,
            minimal_response: false,
            async_ns_resolution: false,
            raw_responses_sink: None,
        }
    }
}

// the QNAME minimization state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QnameMin {
    Min,
    MinFallback,
    Full,
}

// one level of the delegation walk
struct Frame {
    zone_cut: DomainName,
    iterator: NameServerIterator,
}

/// Per-outermost-query state: referral depth and the loop-detection set of
/// (name, type) pairs currently being resolved.
#[derive(Debug, Default)]
struct QueryContext {
    depth: usize,
    in_progress: HashSet<(DomainName, u16)>,
}

#[derive(Clone)]
pub struct Resolver {
    dispatcher: Arc<dyn Dispatcher>,
    cache: Arc<dyn Cache>,
    anchors: Arc<TrustAnchors>,
    roots: Vec<NameServer>,
}

impl Resolver {
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            dispatcher,
            cache: Arc::new(NullCache),
            anchors: Arc::new(TrustAnchors::default_root()),
            roots: root::root_servers(),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_trust_anchors(mut self, anchors: Arc<TrustAnchors>) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn with_roots(mut self, roots: Vec<NameServer>) -> Self {
        self.roots = roots;
        self
    }

    /// Resolve one question iteratively and return a synthesized response
    /// datagram (QR=1, RA=1). NXDOMAIN and NODATA are answers, not errors;
    /// exhausted budgets and broken DNSSEC chains are errors.
    pub async fn resolve(&self, question: &Question, options: &ResolverOptions) -> DNSResult<Message> {
        let mut ctx = QueryContext::default();
        self.resolve_question(question, options, &mut ctx, 0).await
    }

    fn resolve_question<'a>(
        &'a self,
        question: &'a Question,
        options: &'a ResolverOptions,
        ctx: &'a mut QueryContext,
        glue_depth: usize,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = DNSResult<Message>> + Send + 'a>> {
        Box::pin(async move {
            let key = (question.name.clone(), question.qtype.code());
            if !ctx.in_progress.insert(key.clone()) {
                return Err(
                    ResolveError::ServFail(format!("resolution loop on {}", question.name)).into(),
                );
            }
            let result = self.resolve_inner(question, options, ctx, glue_depth).await;
            ctx.in_progress.remove(&key);
            result
        })
    }

    async fn resolve_inner(
        &self,
        question: &Question,
        options: &ResolverOptions,
        ctx: &mut QueryContext,
        glue_depth: usize,
    ) -> DNSResult<Message> {
        // the cache may answer outright; cache trouble is never fatal
        if let Some(hit) = self.cache.get(&question.name, question.qtype).await {
            trace!("cache hit for {}/{}", question.name, question.qtype);
            return Ok(self.from_cache(question, hit, options));
        }

        let mut qname = question.name.clone();
        let mut chain: Vec<ResourceRecord> = Vec::new();
        let mut hops = 0usize;
        let mut seen: HashSet<(DomainName, u16)> = HashSet::new();
        seen.insert((qname.clone(), question.qtype.code()));
        let mut weakest: Option<TrustState> = None;

        loop {
            let response = self
                .walk_tree(&qname, question.qtype, options, ctx, glue_depth)
                .await?;

            if let Some(sink) = &options.raw_responses_sink {
                let _ = sink.send(response.clone());
            }

            if options.dnssec_validation {
                let hop_question = Question::with_name(qname.clone(), question.qtype);
                let validator = Validator::new(
                    self.anchors.clone(),
                    Arc::new(SubFetcher::new(self.clone(), options)),
                );
                let outcome = validator.validate(&response, &hop_question).await;
                debug!("validation of {}/{}: {:?}", qname, question.qtype, outcome.state);

                match outcome.state {
                    TrustState::Bogus => {
                        let reason = outcome.reason.unwrap_or_else(|| "chain broken".to_string());
                        warn!("bogus response for {}: {}", qname, reason);
                        return Err(DnssecError::Bogus(reason).into());
                    }
                    state => weakest = Some(weaker(weakest, state)),
                }
            }

            if response.rcode() == ResponseCode::NXDomain {
                return Ok(self.assemble(question, chain, Some(&response), Vec::new(), weakest, options));
            }

            // extract from this response, following in-bailiwick aliases
            let mut advanced = false;
            loop {
                let direct: Vec<ResourceRecord> = response
                    .answers_for(&qname, question.qtype)
                    .into_iter()
                    .cloned()
                    .collect();
                if !direct.is_empty() {
                    let mut records = direct;
                    records.extend(self.sigs_for(&response, &qname, question.qtype));
                    self.cache_answer(&records, weakest).await;
                    return Ok(self.assemble(question, chain, Some(&response), records, weakest, options));
                }

                // the question itself asked for the alias type: no chasing
                if question.qtype == QType::CNAME || question.qtype == QType::DNAME {
                    break;
                }

                if let Some((alias, records)) = self.follow_alias(&response, &qname)? {
                    hops += 1;
                    if hops > MAX_CNAME_HOPS || !seen.insert((alias.clone(), question.qtype.code()))
                    {
                        return Err(ResolveError::CnameLoop.into());
                    }
                    chain.extend(records);
                    qname = alias;
                    advanced = true;
                    continue;
                }
                break;
            }

            if !advanced {
                // NODATA: the name exists, the type does not
                return Ok(self.assemble(question, chain, Some(&response), Vec::new(), weakest, options));
            }

            // alias target not in this response: walk again for the new name
        }
    }

    /// CNAME at the current name, or DNAME above it (with its substitution).
    /// Returns the new query name plus the records to append to the chain.
    fn follow_alias(
        &self,
        response: &Message,
        qname: &DomainName,
    ) -> DNSResult<Option<(DomainName, Vec<ResourceRecord>)>> {
        for rr in &response.answers {
            if let RData::CNAME(target) = &rr.rdata {
                if &rr.name == qname {
                    let mut records = vec![rr.clone()];
                    records.extend(self.sigs_for(response, qname, QType::CNAME));
                    return Ok(Some((target.clone(), records)));
                }
            }
        }

        for rr in &response.answers {
            if let RData::DNAME(target) = &rr.rdata {
                if qname.is_subdomain_of(&rr.name) && qname != &rr.name {
                    let substituted = qname.substitute(&rr.name, target)?;
                    let mut records = vec![rr.clone()];
                    records.extend(self.sigs_for(response, &rr.name, QType::DNAME));
                    // the synthesized CNAME mirrors what the server derived
                    records.push(ResourceRecord::new(
                        qname.clone(),
                        QType::CNAME,
                        rr.ttl,
                        RData::CNAME(substituted.clone()),
                    ));
                    return Ok(Some((substituted, records)));
                }
            }
        }

        Ok(None)
    }

    fn sigs_for(&self, response: &Message, name: &DomainName, covered: QType) -> Vec<ResourceRecord> {
        response
            .answers
            .iter()
            .filter(|rr| {
                &rr.name == name
                    && matches!(&rr.rdata, RData::RRSIG(sig) if sig.type_covered == covered)
            })
            .cloned()
            .collect()
    }

    /// Walk the delegation tree until some server answers authoritatively
    /// for `qname` (positively or negatively).
    async fn walk_tree(
        &self,
        qname: &DomainName,
        qtype: QType,
        options: &ResolverOptions,
        ctx: &mut QueryContext,
        glue_depth: usize,
    ) -> DNSResult<Message> {
        let concurrency = options.concurrency.max(1) as usize;
        let mut frame = Frame {
            zone_cut: DomainName::root(),
            iterator: NameServerIterator::new(&self.roots, options.prefer_ipv6, concurrency),
        };

        let mut qmin = if options.qname_minimization {
            QnameMin::Min
        } else {
            QnameMin::Full
        };
        let mut fallbacks = 0usize;
        // deepest label count probed so far under minimization
        let mut min_depth = 0usize;
        // how this walk failed, should it fail
        let mut saw_timeout = false;
        let mut saw_other = false;

        loop {
            let (probe_name, probe_type) = match qmin {
                QnameMin::Min => {
                    let depth = frame.zone_cut.label_count().max(min_depth) + 1;
                    if depth >= qname.label_count() {
                        (qname.clone(), qtype)
                    } else {
                        (qname.suffix(depth), QType::NS)
                    }
                }
                QnameMin::MinFallback | QnameMin::Full => (qname.clone(), qtype),
            };
            let minimized = probe_name != *qname || probe_type != qtype;

            let selection = match frame.iterator.select_next() {
                Some(selection) => selection,
                None if saw_timeout && !saw_other => return Err(ResolveError::Timeout.into()),
                None => return Err(ResolveError::NoReachableAuthorities.into()),
            };

            let servers = match selection {
                Selection::Unresolved(ns) => {
                    if glue_depth >= MAX_GLUE_DEPTH {
                        debug!("glue depth exhausted hunting {}", ns.host);
                        frame.iterator.record_timeout(&ns);
                        frame.iterator.move_next();
                        continue;
                    }
                    match self.hunt_glue(&ns.host, options, ctx, glue_depth).await {
                        Ok(addrs) if !addrs.is_empty() => {
                            for addr in addrs {
                                frame.iterator.resolve_endpoint(&ns.host, addr);
                            }
                        }
                        _ => {
                            debug!("no address found for nameserver {}", ns.host);
                            frame.iterator.record_timeout(&ns);
                            frame.iterator.move_next();
                        }
                    }
                    continue;
                }
                Selection::Batch(batch) => batch,
            };

            let request = self.build_request(&probe_name, probe_type, options, &frame, glue_depth);
            let (response, server) = match self.dispatch_batch(&servers, &request, options).await {
                Ok(won) => won,
                Err(failures) => {
                    for (ns, error) in failures {
                        match error {
                            DispatchError::Timeout => {
                                saw_timeout = true;
                                frame.iterator.record_timeout(&ns);
                            }
                            DispatchError::Malformed => {
                                saw_other = true;
                                frame.iterator.record_bogus(&ns);
                            }
                            DispatchError::Fatal(reason) => {
                                return Err(ResolveError::ServFail(reason).into())
                            }
                        }
                    }
                    continue;
                }
            };

            match response.rcode() {
                ResponseCode::NoError | ResponseCode::NXDomain => {}
                rcode => {
                    debug!("{} answered {}", server, rcode);
                    saw_other = true;
                    frame.iterator.record_bogus(&server);
                    continue;
                }
            }

            // a referral moves the walk one zone down
            if let Some(referral) =
                self.usable_referral(&response, &frame, qname, &probe_name, probe_type)
            {
                self.adopt_referral(&mut frame, referral, &response, options, ctx)?;
                if options.qname_minimization && qmin != QnameMin::Full {
                    qmin = if fallbacks >= 2 { QnameMin::Full } else { QnameMin::Min };
                }
                min_depth = min_depth.max(frame.zone_cut.label_count());
                continue;
            }

            if minimized {
                // a cut can also show up as an NS answer when the server is
                // authoritative for both sides
                let ns_answer: Vec<ResourceRecord> = response
                    .answers_for(&probe_name, QType::NS)
                    .into_iter()
                    .cloned()
                    .collect();
                if let Some(set) = RRSet::from_records(ns_answer) {
                    self.adopt_referral(&mut frame, set, &response, options, ctx)?;
                    min_depth = min_depth.max(frame.zone_cut.label_count());
                    continue;
                }

                // negative probe: NXDOMAIN or NODATA for the minimized name
                if options.qname_min_fallback {
                    trace!("minimized probe {} denied, retrying full name", probe_name);
                    qmin = QnameMin::MinFallback;
                    fallbacks += 1;
                    frame.iterator.rewind_to_current();
                } else if response.rcode() == ResponseCode::NXDomain {
                    return Ok(response);
                } else {
                    // walk through the empty non-terminal
                    min_depth = probe_name.label_count();
                }
                continue;
            }

            // authoritative enough: an answer, NXDOMAIN, or NODATA for the
            // full question
            if response.header.flags.authoritative_answer
                || !response.answers.is_empty()
                || response.rcode() == ResponseCode::NXDomain
            {
                return Ok(response);
            }

            // lame: not authoritative, no referral, no answer
            debug!("lame response from {}", server);
            saw_other = true;
            frame.iterator.record_insecure(&server);
        }
    }

    /// An NS set in authority that is strictly deeper than the current cut
    /// and still above the query name.
    fn usable_referral(
        &self,
        response: &Message,
        frame: &Frame,
        qname: &DomainName,
        probe_name: &DomainName,
        probe_type: QType,
    ) -> Option<RRSet> {
        // answers for the probe mean this is not a referral
        if !response.answers.is_empty() {
            return None;
        }
        let referral = response.referral()?;
        let cut = referral.name();

        // the DS RRset lives on the parent side of its cut: following a
        // referral down to the owner would ask the wrong zone
        if probe_type == QType::DS && cut == probe_name {
            return None;
        }

        let deeper = cut.is_subdomain_of(&frame.zone_cut)
            && cut.label_count() > frame.zone_cut.label_count();
        let relevant = qname.is_subdomain_of(cut) || probe_name.is_subdomain_of(cut);
        (deeper && relevant).then_some(referral)
    }

    fn adopt_referral(
        &self,
        frame: &mut Frame,
        referral: RRSet,
        response: &Message,
        options: &ResolverOptions,
        ctx: &mut QueryContext,
    ) -> DNSResult<()> {
        ctx.depth += 1;
        if ctx.depth > MAX_REFERRAL_DEPTH {
            return Err(ResolveError::ReferralDepthExceeded.into());
        }

        let mut servers = Vec::new();
        for rr in referral.records() {
            let host = match &rr.rdata {
                RData::NS(host) => host.clone(),
                _ => continue,
            };
            let glue = response.glue_for(&host);
            if glue.is_empty() {
                servers.push(NameServer::unresolved(host));
            } else {
                for addr in glue {
                    servers.push(NameServer::resolved(host.clone(), addr));
                }
            }
        }

        debug!(
            "referral to {} with {} servers (depth {})",
            referral.name(),
            servers.len(),
            ctx.depth
        );

        frame.zone_cut = referral.name().clone();
        frame.iterator = NameServerIterator::new(
            &servers,
            options.prefer_ipv6,
            options.concurrency.max(1) as usize,
        );
        Ok(())
    }

    /// Find addresses for a nameserver whose endpoint the referral did not
    /// carry. Failure only abandons this server.
    async fn hunt_glue(
        &self,
        host: &DomainName,
        options: &ResolverOptions,
        ctx: &mut QueryContext,
        glue_depth: usize,
    ) -> DNSResult<Vec<IpAddr>> {
        // glue sub-queries never validate; bogus glue surfaces later anyway
        let mut sub_options = options.clone();
        sub_options.dnssec_validation = false;
        sub_options.raw_responses_sink = None;
        sub_options.ecs = None;

        let mut addrs = Vec::new();

        let question = Question::with_name(host.clone(), QType::A);
        if let Ok(response) = self
            .resolve_question(&question, &sub_options, ctx, glue_depth + 1)
            .await
        {
            addrs.extend(address_records(&response, host));
        }

        if options.prefer_ipv6 || options.async_ns_resolution || addrs.is_empty() {
            let question = Question::with_name(host.clone(), QType::AAAA);
            if let Ok(response) = self
                .resolve_question(&question, &sub_options, ctx, glue_depth + 1)
                .await
            {
                addrs.extend(address_records(&response, host));
            }
        }

        Ok(addrs)
    }

    fn build_request(
        &self,
        name: &DomainName,
        qtype: QType,
        options: &ResolverOptions,
        frame: &Frame,
        glue_depth: usize,
    ) -> Message {
        let request = Message::new_query(Question::with_name(name.clone(), qtype));

        let mut edns = Edns::new(options.udp_payload_size, options.dnssec_validation);
        // client subnet only travels from the outermost frame, and never to
        // the roots
        if glue_depth == 0 && !frame.zone_cut.is_root() {
            if let Some(ecs) = &options.ecs {
                edns.options.push(EdnsOption::ClientSubnet(ecs.clone()));
            }
        }
        request.with_edns(edns)
    }

    /// Fan a request out to a batch; the first well-formed response wins and
    /// the losers are cancelled.
    async fn dispatch_batch(
        &self,
        servers: &[NameServer],
        request: &Message,
        options: &ResolverOptions,
    ) -> Result<(Message, NameServer), Vec<(NameServer, DispatchError)>> {
        let (cancel_tx, cancel_rx) = cancel_pair();
        let dispatch_options = DispatchOptions {
            dnssec_ok: options.dnssec_validation,
            udp_payload_size: options.udp_payload_size,
            timeout_ms: options.timeout_ms,
            retries: options.retries,
            ecs: options.ecs.clone(),
            include_ecs: request
                .edns
                .as_ref()
                .map(|e| !e.options.is_empty())
                .unwrap_or(false),
        };

        let mut join_set = JoinSet::new();
        for ns in servers {
            let dispatcher = self.dispatcher.clone();
            let ns = ns.clone();
            let request = request.clone();
            let dispatch_options = dispatch_options.clone();
            let cancel = cancel_rx.clone();
            join_set.spawn(async move {
                let result = dispatcher.query(&ns, &request, &dispatch_options, cancel).await;
                (ns, result)
            });
        }

        let request_id = request.header.id;
        let mut failures = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            let (ns, result) = match joined {
                Ok(done) => done,
                Err(_) => continue,
            };
            match result {
                Ok(response)
                    if response.is_response() && response.header.id == request_id =>
                {
                    let _ = cancel_tx.send(true);
                    join_set.abort_all();
                    return Ok((response, ns));
                }
                Ok(_) => failures.push((ns, DispatchError::Malformed)),
                Err(error) => failures.push((ns, error)),
            }
        }
        Err(failures)
    }

    async fn cache_answer(&self, records: &[ResourceRecord], weakest: Option<TrustState>) {
        let data: Vec<ResourceRecord> = records
            .iter()
            .filter(|rr| !matches!(rr.rdata, RData::RRSIG(_)))
            .cloned()
            .collect();
        if let Some(rrset) = RRSet::from_records(data) {
            let state = weakest.unwrap_or(TrustState::Indeterminate);
            self.cache.put(rrset, state).await;
        }
    }

    fn from_cache(
        &self,
        question: &Question,
        hit: cache::CachedRRSet,
        options: &ResolverOptions,
    ) -> Message {
        let mut records = Vec::new();
        for rr in hit.rrset.records() {
            let mut rr = rr.clone();
            rr.ttl = hit.ttl_remaining;
            records.push(rr);
        }
        let weakest = options.dnssec_validation.then_some(hit.state);
        self.assemble(question, Vec::new(), None, records, weakest, options)
    }

    /// Build the datagram handed back to the caller: QR=1, RA=1, the chased
    /// chain ahead of the final records, authority/additional trimmed on
    /// demand.
    fn assemble(
        &self,
        question: &Question,
        chain: Vec<ResourceRecord>,
        final_response: Option<&Message>,
        final_records: Vec<ResourceRecord>,
        weakest: Option<TrustState>,
        options: &ResolverOptions,
    ) -> Message {
        let mut message = Message::default();

        message.header.id = rand::thread_rng().gen::<u16>();
        message.header.flags.packet_type = PacketType::Response;
        message.header.flags.recursion_desired = true;
        message.header.flags.recursion_available = true;
        message.header.flags.response_code = final_response
            .map(|r| r.rcode())
            .unwrap_or(ResponseCode::NoError);
        message.header.flags.authentic_data = weakest == Some(TrustState::Secure);

        message.questions.push(question.clone());
        message.answers = chain;
        message.answers.extend(final_records);

        let negative = message.answers.is_empty()
            || message.header.flags.response_code == ResponseCode::NXDomain;

        if let Some(response) = final_response {
            if !options.minimal_response {
                message.authorities = response.authorities.clone();
                message.additionals = response.additionals.clone();
            } else if negative {
                // keep the proof of the negative, drop the rest
                message.authorities = response.authorities.clone();
            }
        }

        message.edns = Some(Edns::new(options.udp_payload_size, options.dnssec_validation));
        message
    }
}

// prefer the weaker of two trust states
fn weaker(current: Option<TrustState>, incoming: TrustState) -> TrustState {
    fn rank(state: TrustState) -> u8 {
        match state {
            TrustState::Secure => 3,
            TrustState::Insecure => 2,
            TrustState::Indeterminate => 1,
            TrustState::Bogus => 0,
        }
    }
    match current {
        None => incoming,
        Some(current) if rank(incoming) < rank(current) => incoming,
        Some(current) => current,
    }
}

fn address_records(response: &Message, host: &DomainName) -> Vec<IpAddr> {
    response
        .answers
        .iter()
        .filter(|rr| &rr.name == host)
        .filter_map(|rr| match &rr.rdata {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect()
}

/// The validator's window back into the resolver: DNSKEY/DS sub-queries with
/// validation off (the chain walk does its own checking).
struct SubFetcher {
    resolver: Resolver,
    options: ResolverOptions,
}

impl SubFetcher {
    fn new(resolver: Resolver, options: &ResolverOptions) -> Self {
        let mut options = options.clone();
        options.dnssec_validation = false;
        options.minimal_response = false;
        options.raw_responses_sink = None;
        options.ecs = None;
        Self { resolver, options }
    }
}

#[async_trait]
impl ChainFetcher for SubFetcher {
    async fn fetch(&self, name: &DomainName, qtype: QType) -> DNSResult<Message> {
        let question = Question::with_name(name.clone(), qtype);
        let mut ctx = QueryContext::default();
        self.resolver
            .resolve_question(&question, &self.options, &mut ctx, 0)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weakest_link() {
        assert_eq!(weaker(None, TrustState::Secure), TrustState::Secure);
        assert_eq!(
            weaker(Some(TrustState::Secure), TrustState::Insecure),
            TrustState::Insecure
        );
        assert_eq!(
            weaker(Some(TrustState::Insecure), TrustState::Secure),
            TrustState::Insecure
        );
        assert_eq!(
            weaker(Some(TrustState::Insecure), TrustState::Bogus),
            TrustState::Bogus
        );
    }
}
