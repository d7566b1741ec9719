//! RR Class values: https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.4
use std::fmt;

use byteorder::ReadBytesExt;

use dns_derive::DnsEnum;

use crate::derive_enum;
use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DnsEnum)]
#[repr(u16)]
pub enum QClass {
    IN = 1, // the Internet
    CS = 2, // the CSNET class (Obsolete - used only for examples in some obsolete RFCs)
    CH = 3, // the CHAOS class
    HS = 4, // Hesiod [Dyer 87]
    ANY = 255,
}

impl fmt::Display for QClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

derive_enum!(QClass, u16);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip() {
        let mut wtr = MessageWriter::new();
        QClass::IN.to_network_bytes(&mut wtr).unwrap();
        assert_eq!(wtr.as_slice(), &[0x00, 0x01]);

        let raw = wtr.into_bytes();
        let mut rdr = Cursor::new(raw.as_slice());
        let mut back = QClass::default();
        back.from_network_bytes(&mut rdr).unwrap();
        assert_eq!(back, QClass::IN);
    }

    #[test]
    fn unknown_class_rejected() {
        let raw = [0x00u8, 0x2a];
        let mut rdr = Cursor::new(raw.as_slice());
        let mut back = QClass::default();
        assert!(back.from_network_bytes(&mut rdr).is_err());
    }

    #[test]
    fn from_string() {
        assert_eq!("IN".parse::<QClass>().unwrap(), QClass::IN);
        assert!("XX".parse::<QClass>().is_err());
    }
}
