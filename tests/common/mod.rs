//! Shared scaffolding for the integration tests: a scripted in-memory
//! dispatcher playing a set of authoritative servers, plus message builders.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use recursor::resolver::dispatcher::{CancelSignal, DispatchError, DispatchOptions, Dispatcher};
use recursor::resolver::ns::NameServer;
use recursor::rfc::domain::DomainName;
use recursor::rfc::flags::PacketType;
use recursor::rfc::message::Message;
use recursor::rfc::qtype::QType;
use recursor::rfc::rdata::a::A;
use recursor::rfc::rdata::soa::SOA;
use recursor::rfc::rdata::RData;
use recursor::rfc::resource_record::ResourceRecord;
use recursor::rfc::response_code::ResponseCode;

pub type QueryKey = (IpAddr, String, u16);

pub enum Reply {
    Answer(Message),
    Timeout,
    Dynamic(Box<dyn Fn(&Message) -> Message + Send + Sync>),
}

#[derive(Default)]
pub struct ScriptedDispatcher {
    replies: Mutex<HashMap<QueryKey, Arc<Reply>>>,
    log: Mutex<Vec<QueryKey>>,
}

impl ScriptedDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, server: &str, qname: &str, qtype: QType, reply: Reply) {
        let key = (
            server.parse().unwrap(),
            qname.to_string(),
            qtype.code(),
        );
        self.replies.lock().unwrap().insert(key, Arc::new(reply));
    }

    pub fn queries(&self) -> Vec<QueryKey> {
        self.log.lock().unwrap().clone()
    }

    pub fn queries_for(&self, server: &str) -> Vec<(String, u16)> {
        let server: IpAddr = server.parse().unwrap();
        self.queries()
            .into_iter()
            .filter(|(ip, _, _)| *ip == server)
            .map(|(_, name, qtype)| (name, qtype))
            .collect()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    async fn query(
        &self,
        server: &NameServer,
        request: &Message,
        _options: &DispatchOptions,
        _cancel: CancelSignal,
    ) -> Result<Message, DispatchError> {
        let addr = server
            .addr
            .ok_or_else(|| DispatchError::Fatal("unresolved server".to_string()))?;
        let question = &request.questions[0];
        let key = (addr.ip(), question.name.to_string(), question.qtype.code());

        self.log.lock().unwrap().push(key.clone());

        let reply = self.replies.lock().unwrap().get(&key).cloned();
        match reply.as_deref() {
            Some(Reply::Answer(message)) => {
                let mut message = message.clone();
                message.header.id = request.header.id;
                Ok(message)
            }
            Some(Reply::Dynamic(build)) => {
                let mut message = build(request);
                message.header.id = request.header.id;
                Ok(message)
            }
            Some(Reply::Timeout) | None => Err(DispatchError::Timeout),
        }
    }
}

// ----- record builders -----

pub fn name(s: &str) -> DomainName {
    s.parse().unwrap()
}

pub fn a_rr(owner: &str, addr: &str) -> ResourceRecord {
    ResourceRecord::new(
        name(owner),
        QType::A,
        300,
        RData::A(A(addr.parse().unwrap())),
    )
}

pub fn ns_rr(zone: &str, host: &str) -> ResourceRecord {
    ResourceRecord::new(name(zone), QType::NS, 3600, RData::NS(name(host)))
}

pub fn cname_rr(owner: &str, target: &str) -> ResourceRecord {
    ResourceRecord::new(name(owner), QType::CNAME, 300, RData::CNAME(name(target)))
}

pub fn dname_rr(owner: &str, target: &str) -> ResourceRecord {
    ResourceRecord::new(name(owner), QType::DNAME, 300, RData::DNAME(name(target)))
}

pub fn soa_rr(zone: &str) -> ResourceRecord {
    ResourceRecord::new(
        name(zone),
        QType::SOA,
        300,
        RData::SOA(SOA {
            mname: name(&format!("ns1.{}", zone.trim_end_matches('.'))),
            rname: name(&format!("hostmaster.{}", zone.trim_end_matches('.'))),
            serial: 1,
            refresh: 7200,
            retry: 3600,
            expire: 1209600,
            minimum: 300,
        }),
    )
}

// ----- message builders -----

fn response() -> Message {
    let mut message = Message::default();
    message.header.flags.packet_type = PacketType::Response;
    message
}

/// A delegation: NS set in authority, optional glue in additional, AA clear.
pub fn referral(zone: &str, servers: &[(&str, Option<&str>)]) -> Message {
    let mut message = response();
    for (host, glue) in servers {
        message.authorities.push(ns_rr(zone, host));
        if let Some(addr) = glue {
            message.additionals.push(a_rr(host, addr));
        }
    }
    message
}

/// An authoritative answer.
pub fn answer(records: Vec<ResourceRecord>) -> Message {
    let mut message = response();
    message.header.flags.authoritative_answer = true;
    message.answers = records;
    message
}

/// An authoritative NODATA: empty answer, SOA in authority.
pub fn no_data(zone: &str) -> Message {
    let mut message = response();
    message.header.flags.authoritative_answer = true;
    message.authorities.push(soa_rr(zone));
    message
}

/// An authoritative NXDOMAIN.
pub fn nx_domain(zone: &str) -> Message {
    let mut message = no_data(zone);
    message.header.flags.response_code = ResponseCode::NXDomain;
    message
}

// the root everywhere in these tests
pub const ROOT_IP: &str = "10.0.0.1";

pub fn test_roots() -> Vec<NameServer> {
    vec![NameServer::resolved(
        name("test-root.invalid"),
        ROOT_IP.parse().unwrap(),
    )]
}
