//! Module for some utility functions, including debug
use std::io::Cursor;

// A domain name is null terminated or terminated by a pointer as explained in the RFC1035
pub fn is_pointer(x: u8) -> bool {
    x & 0b1100_0000 == 0b1100_0000
}

// Convert a wireshark-like hex dump into the raw bytes it describes. Used by
// tests to keep captured samples readable:
//
// 0000   76 86 81 a0 00 01 00 08 00 00 00 01
pub fn get_sample_slice(dump: &str) -> Vec<u8> {
    let mut sample = Vec::new();

    for line in dump.lines() {
        // the first column is the offset, not data
        for hex in line.split_whitespace().skip(1) {
            if let Ok(byte) = u8::from_str_radix(hex, 16) {
                sample.push(byte);
            }
        }
    }

    sample
}

// Debug utility
pub fn pretty_cursor(rdr: &Cursor<&[u8]>) {
    let reference = rdr.get_ref();

    eprintln!("position={}", rdr.position());

    eprint!("index:");
    for i in 0..reference.len() {
        eprint!("{:02} ", i);
    }
    eprintln!();

    eprint!("byte :");
    for x in *reference {
        eprint!("{:02X} ", x);
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_slice() {
        const DUMP: &str = r#"
0000   76 86 81 a0 00 01
0010   00 08 00 00 00 01
"#;
        assert_eq!(
            get_sample_slice(DUMP),
            &[0x76, 0x86, 0x81, 0xa0, 0x00, 0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn pointer() {
        assert!(is_pointer(0xc0));
        assert!(is_pointer(0xff));
        assert!(!is_pointer(0x3f));
        assert!(!is_pointer(0x00));
    }
}
