//! Frame construction and the payload integrity checksum.
//!
//! Wire layout, all fields big-endian:
//!
//! | field    | size           |
//! |----------|----------------|
//! | preamble | 16 bits        |
//! | sync     | 8 bits         |
//! | length   | 32 bits        |
//! | payload  | `length` bytes |
//! | checksum | 16 bits        |

use crate::bits::bytes_to_bits;
use crate::FRAME_SIGNATURE;

/// CRC-16/CCITT-FALSE over the payload bytes.
///
/// Init `0xFFFF`, polynomial `0x1021`, no reflection, no final XOR. The
/// receiver recomputes this independently, so the variant must match
/// bit-for-bit; any deviation breaks interoperability, not just this crate.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u32 = 0xFFFF;
    for &byte in data {
        crc ^= (byte as u32) << 8;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x1_0000 != 0 {
                crc ^= 0x1021;
            }
        }
    }
    (crc & 0xFFFF) as u16
}

/// Build the transmittable bit sequence for one payload:
/// signature, 32-bit length, payload bytes, CRC-16.
///
/// The protocol's 1 MiB payload ceiling is a receive-side guard against
/// corrupt length fields, so nothing is enforced here beyond memory.
pub fn build_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame_bytes = Vec::with_capacity(4 + payload.len() + 2);
    frame_bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame_bytes.extend_from_slice(payload);
    frame_bytes.extend_from_slice(&crc16(payload).to_be_bytes());

    let mut bits = Vec::with_capacity(FRAME_SIGNATURE.len() + frame_bytes.len() * 8);
    bits.extend_from_slice(&FRAME_SIGNATURE);
    bits.extend(bytes_to_bits(&frame_bytes));
    bits
}
