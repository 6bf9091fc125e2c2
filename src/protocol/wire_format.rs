//! Wire format encoding and decoding.
//!
//! Implements the 13-byte trapper header:
//! ```text
//! ┌──────────┬─────────┬──────────────┐
//! │ Magic    │ Version │ Length       │
//! │ 4 bytes  │ 1 byte  │ 8 bytes      │
//! │ "ZBXD"   │         │ uint64 LE    │
//! └──────────┴─────────┴──────────────┘
//! ```
//!
//! The same header shape is used for requests and replies.

/// Protocol magic, first four bytes of every frame.
pub const MAGIC: [u8; 4] = *b"ZBXD";

/// Header size in bytes (fixed, exactly 13).
pub const HEADER_SIZE: usize = 13;

/// Protocol version written by default.
pub const DEFAULT_PROTOCOL_VERSION: u8 = 1;

/// Decoded header from wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Magic bytes as received (or [`MAGIC`] when encoding).
    pub magic: [u8; 4],
    /// Protocol version byte.
    pub version: u8,
    /// Body length in bytes.
    pub length: u64,
}

impl Header {
    /// Create a header with the standard magic.
    pub fn new(version: u8, length: u64) -> Self {
        Self {
            magic: MAGIC,
            version,
            length,
        }
    }

    /// Encode header to bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use zabbix_sender::protocol::Header;
    ///
    /// let bytes = Header::new(1, 2).encode();
    /// assert_eq!(&bytes[..5], b"ZBXD\x01");
    /// assert_eq!(&bytes[5..], &[2, 0, 0, 0, 0, 0, 0, 0]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (13 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= HEADER_SIZE);
        buf[0..4].copy_from_slice(&self.magic);
        buf[4] = self.version;
        buf[5..13].copy_from_slice(&self.length.to_le_bytes());
    }

    /// Decode header from bytes.
    ///
    /// Returns `None` if buffer is too short. The magic is not checked here,
    /// see [`Header::has_valid_magic`].
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);
        let mut length = [0u8; 8];
        length.copy_from_slice(&buf[5..13]);
        Some(Self {
            magic,
            version: buf[4],
            length: u64::from_le_bytes(length),
        })
    }

    /// Check the magic bytes against [`MAGIC`].
    #[inline]
    pub fn has_valid_magic(&self) -> bool {
        self.magic == MAGIC
    }
}

/// Check whether a raw buffer starts with the protocol magic.
#[inline]
pub fn starts_with_magic(buf: &[u8]) -> bool {
    buf.len() >= MAGIC.len() && buf[..MAGIC.len()] == MAGIC
}
