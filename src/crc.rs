//! CRC-32 as used by PNG chunk integrity fields
//!
//! Reflected polynomial `0xEDB88320`, register preset to `0xFFFFFFFF`,
//! processed one bit at a time and inverted on output. This is the same
//! checksum zlib and every PNG reader compute.

/// Reflected CRC-32 polynomial
const POLYNOMIAL: u32 = 0xEDB88320;

/// Incremental CRC-32 state
///
/// Lets a chunk checksum be built from its type and data without first
/// concatenating them into one buffer.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    register: u32,
}

impl Crc32 {
    /// Start a new checksum
    pub fn new() -> Self {
        Self {
            register: 0xFFFFFFFF,
        }
    }

    /// Feed more bytes into the checksum
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.register ^= byte as u32;
            for _ in 0..8 {
                if self.register & 1 != 0 {
                    self.register = (self.register >> 1) ^ POLYNOMIAL;
                } else {
                    self.register >>= 1;
                }
            }
        }
    }

    /// Final checksum value (the state is left untouched)
    pub fn finalize(&self) -> u32 {
        self.register ^ 0xFFFFFFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-32 of a byte sequence
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(bytes);
    crc.finalize()
}

/// CRC-32 of a chunk, computed over its type tag followed by its data
pub fn chunk_crc(chunk_type: &[u8], data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(chunk_type);
    crc.update(data);
    crc.finalize()
}
