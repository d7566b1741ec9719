//! Traits and helpers to convert DNS structures to network order back & forth.
//!
//! Encoding goes through [`MessageWriter`], which owns the output buffer plus
//! the state a whole-message encoder needs: the suffix map for RFC1035 name
//! compression and the canonical-form switch used by DNSSEC. Decoding reads
//! from a `Cursor` over the whole message so compression pointers can be
//! followed.
use std::collections::HashMap;
use std::io::Cursor;

use byteorder::{BigEndian, WriteBytesExt};

pub mod primitive;

// copy structure data to a network-order buffer
pub trait ToNetworkOrder {
    fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize>;
}

// copy from a network-order buffer to a structure
pub trait FromNetworkOrder {
    fn from_network_bytes(&mut self, rdr: &mut Cursor<&[u8]>) -> crate::error::DNSResult<()>;
}

/// Highest offset a 14-bit compression pointer can carry.
const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// The output side of the codec: a byte buffer plus compression and
/// canonical-form state.
///
/// In canonical form (RFC4034 §6) compression is disabled and owner names as
/// well as the rdata name fields designated by the record type are lowercased.
#[derive(Debug)]
pub struct MessageWriter {
    buf: Vec<u8>,
    // suffix (lowercased labels) -> offset of its first occurrence
    names: Option<HashMap<Vec<String>, u16>>,
    canonical: bool,
    // whether names inside the rdata currently being written may use
    // compression pointers; toggled per record type
    rdata_compression: bool,
}

impl MessageWriter {
    /// Wire mode with name compression.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(512),
            names: Some(HashMap::new()),
            canonical: false,
            rdata_compression: true,
        }
    }

    /// Wire mode without compression (single names, test vectors).
    pub fn uncompressed() -> Self {
        Self {
            buf: Vec::new(),
            names: None,
            canonical: false,
            rdata_compression: true,
        }
    }

    /// Canonical form: no compression, lowercased names.
    pub fn canonical() -> Self {
        Self {
            buf: Vec::new(),
            names: None,
            canonical: true,
            rdata_compression: false,
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    // true when the name being written right now may emit a pointer
    pub fn compression_permitted(&self) -> bool {
        self.names.is_some() && self.rdata_compression && !self.canonical
    }

    // the resource record encoder gates rdata compression by record type
    pub fn set_rdata_compression(&mut self, permitted: bool) {
        self.rdata_compression = permitted;
    }

    pub fn lookup_name(&self, suffix: &[String]) -> Option<u16> {
        self.names.as_ref()?.get(suffix).copied()
    }

    pub fn remember_name(&mut self, suffix: Vec<String>, offset: usize) {
        // offsets past 14 bits cannot be pointed at
        if offset > MAX_POINTER_OFFSET {
            return;
        }
        if let Some(names) = self.names.as_mut() {
            names.entry(suffix).or_insert(offset as u16);
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_u8(&mut self, value: u8) -> std::io::Result<()> {
        self.buf.write_u8(value)
    }

    pub fn write_u16(&mut self, value: u16) -> std::io::Result<()> {
        self.buf.write_u16::<BigEndian>(value)
    }

    pub fn write_u32(&mut self, value: u32) -> std::io::Result<()> {
        self.buf.write_u32::<BigEndian>(value)
    }

    pub fn write_all(&mut self, raw: &[u8]) {
        self.buf.extend_from_slice(raw);
    }

    // patch a 16-bit field written earlier (rdlength back-filling)
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        let be = value.to_be_bytes();
        self.buf[offset] = be[0];
        self.buf[offset + 1] = be[1];
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for MessageWriter {
    fn default() -> Self {
        Self::new()
    }
}
