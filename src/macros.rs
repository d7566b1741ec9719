// auto-implement the wire codec traits for unit enums with a known repr
#[macro_export]
macro_rules! derive_enum {
    ($t:ty, u8) => {
        impl ToNetworkOrder for $t {
            fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
                wtr.write_u8(*self as u8)?;
                Ok(1)
            }
        }

        impl FromNetworkOrder for $t {
            fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
                let value = rdr.read_u8()?;
                match <$t>::try_from(value) {
                    Ok(ct) => {
                        *self = ct;
                        Ok(())
                    }
                    Err(_) => Err($crate::error::CodecError::MalformedMessage.into()),
                }
            }
        }
    };

    ($t:ty, u16) => {
        impl ToNetworkOrder for $t {
            fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
                wtr.write_u16(*self as u16)?;
                Ok(2)
            }
        }

        impl FromNetworkOrder for $t {
            fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
                let value = rdr.read_u16::<byteorder::BigEndian>()?;
                match <$t>::try_from(value) {
                    Ok(ct) => {
                        *self = ct;
                        Ok(())
                    }
                    Err(_) => Err($crate::error::CodecError::MalformedMessage.into()),
                }
            }
        }
    };
}

// useful helpers for tests
#[macro_export]
macro_rules! test_from_network {
    ($slice:ident, $t:ty) => {{
        let s = $crate::util::get_sample_slice($slice);
        let mut rdr = std::io::Cursor::new(s.as_slice());
        let mut v = <$t>::default();
        assert!(v.from_network_bytes(&mut rdr).is_ok());
        v
    }};
}

#[macro_export]
macro_rules! test_to_network {
    ($data:ident) => {{
        let mut wtr = $crate::network_order::MessageWriter::new();
        let bytes_written = $data.to_network_bytes(&mut wtr).unwrap();

        (wtr.into_bytes(), bytes_written)
    }};
}
