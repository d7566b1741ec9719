//! TXT RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.14
use std::fmt;
use std::io::Cursor;

use crate::error::{CodecError, DNSResult};
use crate::network_order::{FromNetworkOrder, MessageWriter, ToNetworkOrder};
use crate::rfc::char_string::CharacterString;

/// One or more character strings, filling the whole rdata.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TXT(pub Vec<CharacterString>);

impl TXT {
    pub fn from_wire(rdr: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut strings = Vec::new();
        while rdr.position() < end {
            let mut cs = CharacterString::default();
            cs.from_network_bytes(rdr)?;
            strings.push(cs);
        }
        if strings.is_empty() {
            return Err(CodecError::MalformedMessage.into());
        }
        Ok(TXT(strings))
    }
}

impl ToNetworkOrder for TXT {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
        self.0.to_network_bytes(wtr)
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for cs in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "\"{}\"", cs)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_strings() {
        let txt = TXT(vec![
            CharacterString::from("v=spf1"),
            CharacterString::from("-all"),
        ]);

        let mut wtr = MessageWriter::new();
        let length = txt.to_network_bytes(&mut wtr).unwrap();
        assert_eq!(length, 12);

        let raw = wtr.into_bytes();
        let mut rdr = Cursor::new(raw.as_slice());
        let back = TXT::from_wire(&mut rdr, raw.len() as u64).unwrap();
        assert_eq!(back, txt);
    }
}
