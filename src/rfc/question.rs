//! Question structure: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2
use std::fmt;

use dns_derive::DnsStruct;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::domain::DomainName;
use crate::rfc::qclass::QClass;
use crate::rfc::qtype::QType;

#[derive(Debug, Default, Clone, PartialEq, DnsStruct)]
pub struct Question {
    pub name: DomainName,
    pub qtype: QType,
    pub qclass: QClass,
}

impl Question {
    /// Create a new question. By default, the IN class is used if None is
    /// provided as the qclass parameter
    pub fn new(domain: &str, qtype: QType, qclass: Option<QClass>) -> DNSResult<Self> {
        let name = DomainName::try_from(domain)?;
        Ok(Question {
            name,
            qtype,
            qclass: qclass.unwrap_or(QClass::IN),
        })
    }

    pub fn with_name(name: DomainName, qtype: QType) -> Self {
        Question {
            name,
            qtype,
            qclass: QClass::IN,
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let question = Question::new("www.google.ie", QType::A, None).unwrap();

        let mut wtr = MessageWriter::uncompressed();
        let length = question.to_network_bytes(&mut wtr).unwrap();
        assert_eq!(length, 19);
        assert_eq!(
            wtr.as_slice(),
            &[
                0x03, 0x77, 0x77, 0x77, 0x06, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x02, 0x69,
                0x65, 0x00, 0x00, 0x01, 0x00, 0x01,
            ]
        );

        let raw = wtr.into_bytes();
        let mut rdr = std::io::Cursor::new(raw.as_slice());
        let mut back = Question::default();
        back.from_network_bytes(&mut rdr).unwrap();
        assert_eq!(back, question);
    }
}
