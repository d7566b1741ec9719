//! DNS packet header: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
use std::fmt;

use dns_derive::DnsStruct;

use crate::error::DNSResult;
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::flags::Flags;

#[derive(Debug, Default, Clone, Copy, DnsStruct)]
pub struct Header {
    pub id: u16, // identifier assigned by the program, copied into the reply
    pub flags: Flags,
    pub qd_count: u16, // number of entries in the question section
    pub an_count: u16, // number of resource records in the answer section
    pub ns_count: u16, // number of name server resource records in the authority section
    pub ar_count: u16, // number of resource records in the additional section
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id:0x{:X} {} qd:{} an:{} ns:{} ar:{}",
            self.id, self.flags, self.qd_count, self.an_count, self.ns_count, self.ar_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rfc::flags::PacketType;
    use crate::rfc::opcode::OpCode;
    use crate::rfc::response_code::ResponseCode;
    use crate::{test_from_network, test_to_network};

    #[test]
    fn dns_packet_header() {
        const PACKET: &str = r#"
0000   76 86 81 a0 00 01 00 08 00 00 00 01
"#;

        // from
        let header = test_from_network!(PACKET, Header);
        assert_eq!(header.id, 0x7686);
        assert_eq!(header.flags.packet_type, PacketType::Response);
        assert_eq!(header.flags.op_code, OpCode::Query);
        assert!(!header.flags.authoritative_answer);
        assert!(!header.flags.truncated);
        assert!(header.flags.recursion_desired);
        assert!(header.flags.recursion_available);
        assert!(!header.flags.z);
        assert!(header.flags.authentic_data);
        assert!(!header.flags.checking_disabled);
        assert_eq!(header.flags.response_code, ResponseCode::NoError);
        assert_eq!(header.qd_count, 1);
        assert_eq!(header.an_count, 8);
        assert_eq!(header.ns_count, 0);
        assert_eq!(header.ar_count, 1);

        // to
        let values = test_to_network!(header);
        assert_eq!(values.0, crate::util::get_sample_slice(PACKET));
        assert_eq!(values.1, 12);
    }
}
