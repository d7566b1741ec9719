//! DNS messages: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1
//!
//! "All communications inside of the domain protocol are carried in a single
//! format called a message". The two codec entry points are [`Message::encode`]
//! and [`Message::decode`]; `decode(encode(m)) == m` for every well-formed
//! message. Decoding never leaves a partially-filled message behind: it either
//! returns a complete one or a `CodecError`.
use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use rand::Rng;

use crate::error::{CodecError, DNSResult};
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;
use crate::rfc::flags::PacketType;
use crate::rfc::header::Header;
use crate::rfc::opcode::OpCode;
use crate::rfc::opt::Edns;
use crate::rfc::qtype::QType;
use crate::rfc::question::Question;
use crate::rfc::rdata::RData;
use crate::rfc::resource_record::ResourceRecord;
use crate::rfc::response_code::ResponseCode;
use crate::rfc::rrset::RRSet;

pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

#[derive(Debug, Default, Clone)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
    // absorbed from / synthesized into the additional section
    pub edns: Option<Edns>,
}

impl Message {
    /// A fresh query with a random id, one question, RD clear: the iterative
    /// resolver never asks anyone to recurse on its behalf.
    pub fn new_query(question: Question) -> Self {
        let mut message = Message::default();

        message.header.id = rand::thread_rng().gen::<u16>();
        message.header.flags.packet_type = PacketType::Query;
        message.header.flags.op_code = OpCode::Query;
        message.questions.push(question);

        message
    }

    pub fn with_edns(mut self, edns: Edns) -> Self {
        self.edns = Some(edns);
        self
    }

    pub fn rcode(&self) -> ResponseCode {
        self.header.flags.response_code
    }

    pub fn is_response(&self) -> bool {
        self.header.flags.packet_type == PacketType::Response
    }

    /// Convert to network bytes. Section counts are computed from the
    /// sections themselves; the OPT pseudo-RR is appended to additional when
    /// EDNS is carried.
    pub fn encode(&self) -> DNSResult<Vec<u8>> {
        let mut wtr = MessageWriter::new();

        let mut header = self.header;
        header.qd_count = self.questions.len() as u16;
        header.an_count = self.answers.len() as u16;
        header.ns_count = self.authorities.len() as u16;
        header.ar_count = self.additionals.len() as u16 + self.edns.is_some() as u16;

        header.to_network_bytes(&mut wtr)?;
        self.questions.to_network_bytes(&mut wtr)?;
        self.answers.to_network_bytes(&mut wtr)?;
        self.authorities.to_network_bytes(&mut wtr)?;
        self.additionals.to_network_bytes(&mut wtr)?;

        if let Some(edns) = &self.edns {
            // the upper 8 bits of the RCODE ride in the OPT TTL field
            let extended_rcode = (self.header.flags.response_code as u16 >> 4) as u8;
            edns.write_opt_rr(&mut wtr, extended_rcode)?;
        }

        Ok(wtr.into_bytes())
    }

    /// Decode a whole message. Any violation is a typed error and nothing of
    /// the partial parse escapes.
    pub fn decode(raw: &[u8]) -> DNSResult<Message> {
        let mut rdr = Cursor::new(raw);

        let mut header = Header::default();
        header.from_network_bytes(&mut rdr)?;

        let mut message = Message {
            header,
            ..Default::default()
        };

        for _ in 0..header.qd_count {
            let mut question = Question::default();
            question.from_network_bytes(&mut rdr)?;
            message.questions.push(question);
        }

        Self::read_section(&mut rdr, header.an_count, &mut message.answers, None)?;
        Self::read_section(&mut rdr, header.ns_count, &mut message.authorities, None)?;

        // the additional section is the only place OPT may live
        let mut edns: Option<Edns> = None;
        Self::read_section(
            &mut rdr,
            header.ar_count,
            &mut message.additionals,
            Some(&mut edns),
        )?;
        message.edns = edns;

        // merge the extended RCODE bits carried by OPT
        if let Some(edns) = &message.edns {
            let merged = (edns.extended_rcode as u16) << 4
                | message.header.flags.response_code as u16 & 0b1111;
            message.header.flags.response_code =
                ResponseCode::try_from(merged).map_err(|_| CodecError::MalformedMessage)?;
        }

        Ok(message)
    }

    fn read_section(
        rdr: &mut Cursor<&[u8]>,
        count: u16,
        section: &mut Vec<ResourceRecord>,
        mut opt_slot: Option<&mut Option<Edns>>,
    ) -> DNSResult<()> {
        for _ in 0..count {
            let mut name = DomainName::default();
            name.from_network_bytes(rdr)?;

            let code = rdr
                .read_u16::<BigEndian>()
                .map_err(|_| CodecError::MalformedMessage)?;
            let qtype = QType::from(code);

            if qtype == QType::OPT {
                // at most one OPT per message, and never as an ordinary RR
                match opt_slot.as_deref_mut() {
                    Some(slot) if slot.is_none() && name.is_root() => {
                        *slot = Some(Edns::read_opt_rr(rdr)?);
                        continue;
                    }
                    _ => return Err(CodecError::MalformedMessage.into()),
                }
            }

            section.push(ResourceRecord::read_tail(name, qtype, rdr)?);
        }
        Ok(())
    }

    // ----- section inspection helpers used by the resolver -----

    pub fn answer_rrsets(&self) -> Vec<RRSet> {
        RRSet::group(&self.answers)
    }

    pub fn authority_rrsets(&self) -> Vec<RRSet> {
        RRSet::group(&self.authorities)
    }

    /// All records of one type in the answer section for `name`.
    pub fn answers_for(&self, name: &DomainName, qtype: QType) -> Vec<&ResourceRecord> {
        self.answers
            .iter()
            .filter(|rr| rr.r#type == qtype && &rr.name == name)
            .collect()
    }

    /// The NS rrset in authority announcing a delegation, if any.
    pub fn referral(&self) -> Option<RRSet> {
        let ns: Vec<ResourceRecord> = self
            .authorities
            .iter()
            .filter(|rr| rr.r#type == QType::NS)
            .cloned()
            .collect();
        RRSet::from_records(ns)
    }

    /// Glue addresses for `host` found in the additional section.
    pub fn glue_for(&self, host: &DomainName) -> Vec<std::net::IpAddr> {
        self.additionals
            .iter()
            .filter(|rr| &rr.name == host)
            .filter_map(|rr| match &rr.rdata {
                RData::A(a) => Some(std::net::IpAddr::V4(a.0)),
                RData::AAAA(aaaa) => Some(std::net::IpAddr::V6(aaaa.0)),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; {}", self.header)?;
        for question in &self.questions {
            writeln!(f, ";; question: {}", question)?;
        }
        for (tag, section) in [
            ("answer", &self.answers),
            ("authority", &self.authorities),
            ("additional", &self.additionals),
        ] {
            for rr in section {
                writeln!(f, "{}\t; {}", rr, tag)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rfc::char_string::CharacterString;
    use crate::rfc::flags::PacketType;
    use crate::rfc::opt::{ClientSubnet, EdnsOption};
    use crate::rfc::qclass::QClass;
    use crate::rfc::rdata::a::A;
    use crate::rfc::rdata::naptr::NAPTR;
    use crate::rfc::rdata::soa::SOA;
    use crate::util::get_sample_slice;

    // a real CNAME answer for google.com captured with wireshark
    const SAMPLE: &str = r#"
0000   41 2a 81 80 00 01 00 00 00 01 00 01 06 67 6f 6f
0010   67 6c 65 03 63 6f 6d 00 00 05 00 01 c0 0c 00 06
0020   00 01 00 00 00 3c 00 26 03 6e 73 31 c0 0c 09 64
0030   6e 73 2d 61 64 6d 69 6e c0 0c 19 1b c0 0c 00 00
0040   03 84 00 00 03 84 00 00 07 08 00 00 00 3c 00 00
0050   29 02 00 00 00 00 00 00 00
"#;

    #[test]
    fn decode_captured_response() {
        let raw = get_sample_slice(SAMPLE);
        let message = Message::decode(&raw).unwrap();

        assert_eq!(message.header.id, 0x412a);
        assert!(message.is_response());
        assert_eq!(message.rcode(), ResponseCode::NoError);
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.questions[0].name.to_string(), "google.com.");
        assert_eq!(message.questions[0].qtype, QType::CNAME);

        assert_eq!(message.authorities.len(), 1);
        let soa = &message.authorities[0];
        assert_eq!(soa.r#type, QType::SOA);
        match &soa.rdata {
            RData::SOA(soa) => {
                assert_eq!(soa.mname.to_string(), "ns1.google.com.");
                assert_eq!(soa.rname.to_string(), "dns-admin.google.com.");
                assert_eq!(soa.serial, 0x191bc00c);
            }
            _ => panic!("expected SOA rdata"),
        }

        // the OPT pseudo-RR was absorbed, not surfaced
        assert!(message.additionals.is_empty());
        let edns = message.edns.unwrap();
        assert_eq!(edns.udp_payload_size, 512);
        assert!(!edns.dnssec_ok);
    }

    fn roundtrip(message: &Message) -> Message {
        let raw = message.encode().unwrap();
        let back = Message::decode(&raw).unwrap();

        // encode(decode(encode(m))) == encode(m)
        assert_eq!(back.encode().unwrap(), raw);
        back
    }

    #[test]
    fn query_roundtrip() {
        let question = Question::new("www.example.com", QType::A, None).unwrap();
        let message =
            Message::new_query(question).with_edns(Edns::new(4096, true));

        let back = roundtrip(&message);
        assert_eq!(back.header.id, message.header.id);
        assert_eq!(back.questions, message.questions);
        assert_eq!(back.edns, message.edns);
    }

    #[test]
    fn response_with_compression_roundtrips() {
        let mut message = Message::default();
        message.header.id = 0x77;
        message.header.flags.packet_type = PacketType::Response;
        message
            .questions
            .push(Question::new("www.example.com", QType::A, None).unwrap());
        message.answers.push(ResourceRecord::new(
            "www.example.com".parse().unwrap(),
            QType::A,
            60,
            RData::A(A("192.0.2.7".parse().unwrap())),
        ));
        message.authorities.push(ResourceRecord::new(
            "example.com".parse().unwrap(),
            QType::NS,
            3600,
            RData::NS("ns1.example.com".parse().unwrap()),
        ));

        let raw = message.encode().unwrap();
        let back = roundtrip(&message);

        assert_eq!(back.answers, message.answers);
        assert_eq!(back.authorities, message.authorities);

        // the owner of the answer must be a pointer into the question
        let uncompressed = {
            let mut wtr = MessageWriter::uncompressed();
            message.header.to_network_bytes(&mut wtr).unwrap();
            message.questions.to_network_bytes(&mut wtr).unwrap();
            message.answers.to_network_bytes(&mut wtr).unwrap();
            message.authorities.to_network_bytes(&mut wtr).unwrap();
            wtr.into_bytes()
        };
        assert!(raw.len() < uncompressed.len());
    }

    #[test]
    fn naptr_roundtrip() {
        let naptr = NAPTR {
            order: 100,
            preference: 10,
            flags: CharacterString::from("U"),
            services: CharacterString::from("SIP+D2U"),
            regexp: CharacterString::from("!^.*$!sip:info@example.com!"),
            replacement: "example.com".parse().unwrap(),
        };

        let mut message = Message::default();
        message.header.flags.packet_type = PacketType::Response;
        message.answers.push(ResourceRecord::new(
            "example.com".parse().unwrap(),
            QType::NAPTR,
            300,
            RData::NAPTR(naptr.clone()),
        ));

        let back = roundtrip(&message);
        assert_eq!(back.answers[0].rdata, RData::NAPTR(naptr));
    }

    #[test]
    fn unknown_type_is_byte_identical() {
        let mut message = Message::default();
        message.header.flags.packet_type = PacketType::Response;
        message.answers.push(ResourceRecord::new(
            "example.com".parse().unwrap(),
            QType::Unknown(4242),
            300,
            RData::Unknown(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        ));

        let back = roundtrip(&message);
        assert_eq!(back.answers[0].r#type, QType::Unknown(4242));
        assert_eq!(back.answers[0].rdata, RData::Unknown(vec![0xDE, 0xAD, 0xBE, 0xEF]));
    }

    #[test]
    fn two_opts_rejected() {
        let question = Question::new("example.com", QType::A, None).unwrap();
        let message = Message::new_query(question).with_edns(Edns::default());
        let mut raw = message.encode().unwrap();

        // duplicate the 11-byte OPT record and bump ar_count
        let opt = raw[raw.len() - 11..].to_vec();
        raw.extend_from_slice(&opt);
        raw[11] = 2;

        assert!(Message::decode(&raw).is_err());
    }

    #[test]
    fn truncated_message_rejected() {
        let question = Question::new("www.example.com", QType::AAAA, None).unwrap();
        let message = Message::new_query(question);
        let raw = message.encode().unwrap();

        for cut in 1..raw.len() {
            assert!(Message::decode(&raw[..cut]).is_err(), "cut at {}", cut);
        }
    }

    #[test]
    fn ecs_option_roundtrips() {
        let mut edns = Edns::new(1232, false);
        edns.options.push(EdnsOption::ClientSubnet(ClientSubnet {
            family: 1,
            source_prefix: 24,
            scope_prefix: 0,
            address: vec![203, 0, 113],
        }));

        let question = Question::new("example.org", QType::HTTPS, None).unwrap();
        let message = Message::new_query(question).with_edns(edns.clone());

        let back = roundtrip(&message);
        assert_eq!(back.edns.unwrap().options, edns.options);
    }

    #[test]
    fn soa_negative_answer_helpers() {
        let mut message = Message::default();
        message.header.flags.packet_type = PacketType::Response;
        message.header.flags.response_code = ResponseCode::NXDomain;
        message.authorities.push(ResourceRecord::new(
            "example.com".parse().unwrap(),
            QType::SOA,
            300,
            RData::SOA(SOA::default()),
        ));

        assert_eq!(message.rcode(), ResponseCode::NXDomain);
        assert!(message.referral().is_none());
        assert_eq!(message.authority_rrsets().len(), 1);
        assert_eq!(message.authority_rrsets()[0].qtype(), QType::SOA);
        assert_eq!(message.authority_rrsets()[0].class(), QClass::IN);
    }
}
