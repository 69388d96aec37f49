//! Conversion between byte sequences and MSB-first bit sequences.
//!
//! Bits are plain `u8` values in {0, 1}. The scanner slices exact, already
//! validated lengths out of its buffer, so the lenient behavior on ragged
//! input here is a defensive default rather than protocol behavior.

/// Expand bytes into bits, most-significant bit of each byte first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1);
        }
    }
    bits
}

/// Pack MSB-first bits back into bytes. An incomplete trailing group of
/// fewer than 8 bits is discarded.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let byte_count = bits.len() / 8;
    let mut bytes = Vec::with_capacity(byte_count);
    for chunk in bits.chunks_exact(8) {
        let mut byte = 0u8;
        for &bit in chunk {
            byte = (byte << 1) | (bit & 1);
        }
        bytes.push(byte);
    }
    bytes
}

/// Fold up to 32 MSB-first bits into an unsigned integer.
pub fn bits_to_u32(bits: &[u8]) -> u32 {
    bits.iter()
        .fold(0u32, |value, &bit| (value << 1) | u32::from(bit & 1))
}

/// Fold up to 16 MSB-first bits into an unsigned integer.
pub fn bits_to_u16(bits: &[u8]) -> u16 {
    bits.iter()
        .fold(0u16, |value, &bit| (value << 1) | u16::from(bit & 1))
}
