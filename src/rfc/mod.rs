//! Wire-level DNS structures, one module per RFC concept.
pub mod char_string;
pub mod domain;
pub mod flags;
pub mod header;
pub mod message;
pub mod opcode;
pub mod opt;
pub mod qclass;
pub mod qtype;
pub mod question;
pub mod rdata;
pub mod resource_record;
pub mod response_code;
pub mod rrset;
