//! Streaming frame scanner.
//!
//! Consumes an accumulating bit buffer and extracts every complete, valid
//! frame it contains. The caller feeds the returned `remaining` buffer back
//! in as the prefix of the next scan once more bits have arrived. The scan
//! cursor only ever moves forward; a rejected signature match advances it by
//! exactly one bit, which both guarantees progress on corrupt data and keeps
//! a signature overlapping the rejected region detectable after bit-slip.

use log::{debug, trace};

use crate::bits::{bits_to_bytes, bits_to_u16, bits_to_u32};
use crate::framing::crc16;
use crate::{CHECKSUM_BITS, FRAME_SIGNATURE, LENGTH_BITS, MAX_PAYLOAD_BYTES, SIGNATURE_BITS};

/// Outcome of one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Validated payloads in left-to-right match order.
    pub frames: Vec<Vec<u8>>,
    /// Unconsumed suffix of the input, to be retained by the caller.
    pub remaining: Vec<u8>,
}

/// Scan with the protocol's full 1 MiB payload ceiling.
pub fn extract_frames(bits: &[u8]) -> ScanResult {
    extract_frames_with_limit(bits, MAX_PAYLOAD_BYTES)
}

/// Scan with a caller-chosen payload ceiling.
///
/// Because an accepted length field commits the scanner to retaining up to
/// `signature + length field + max_payload * 8 + checksum` bits while it
/// waits for the rest of the frame, lowering the ceiling below
/// [`MAX_PAYLOAD_BYTES`] bounds receive-side memory proportionally. Values
/// above the protocol maximum are clamped to it.
pub fn extract_frames_with_limit(bits: &[u8], max_payload: usize) -> ScanResult {
    let max_payload = max_payload.min(MAX_PAYLOAD_BYTES);
    let mut frames = Vec::new();
    let mut cursor = 0usize;

    while cursor + SIGNATURE_BITS <= bits.len() {
        // Seeking: slide forward until the next 24 bits match the signature.
        if bits[cursor..cursor + SIGNATURE_BITS] != FRAME_SIGNATURE[..] {
            cursor += 1;
            continue;
        }

        // Reading length: wait for more data without giving up the match.
        let length_start = cursor + SIGNATURE_BITS;
        let Some(length_field) = bits.get(length_start..length_start + LENGTH_BITS) else {
            break;
        };

        let payload_len = bits_to_u32(length_field) as usize;
        if payload_len > max_payload {
            // False positive: a real frame never claims this much. Advance a
            // single bit so an overlapping genuine signature is still found.
            trace!(
                "signature at bit {cursor} rejected: length {payload_len} exceeds {max_payload}"
            );
            cursor += 1;
            continue;
        }

        // Reading payload + checksum: again wait rather than discard.
        let payload_start = length_start + LENGTH_BITS;
        let checksum_start = payload_start + payload_len * 8;
        let frame_end = checksum_start + CHECKSUM_BITS;
        if frame_end > bits.len() {
            break;
        }

        let payload = bits_to_bytes(&bits[payload_start..checksum_start]);
        let received_crc = bits_to_u16(&bits[checksum_start..frame_end]);
        if crc16(&payload) == received_crc {
            debug!("frame of {payload_len} bytes validated at bit {cursor}");
            frames.push(payload);
            cursor = frame_end;
        } else {
            trace!("signature at bit {cursor} rejected: checksum mismatch");
            cursor += 1;
        }
    }

    ScanResult {
        frames,
        remaining: bits[cursor..].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::bytes_to_bits;
    use crate::framing::build_frame;

    #[test]
    fn test_single_frame_round_trip() {
        let payload = b"Bonjour depuis SoundWires".to_vec();
        let result = extract_frames(&build_frame(&payload));
        assert_eq!(result.frames, vec![payload]);
        assert!(result.remaining.is_empty());
    }

    #[test]
    fn test_empty_payload_frame() {
        let result = extract_frames(&build_frame(&[]));
        assert_eq!(result.frames, vec![Vec::<u8>::new()]);
        assert!(result.remaining.is_empty());
    }

    #[test]
    fn test_no_signature_keeps_tail() {
        // All-zero noise never matches the signature; everything before the
        // last 23 bits is consumed, the tail is kept for the next append.
        let noise = vec![0u8; 100];
        let result = extract_frames(&noise);
        assert!(result.frames.is_empty());
        assert_eq!(result.remaining.len(), SIGNATURE_BITS - 1);
    }

    #[test]
    fn test_short_buffer_untouched() {
        let bits = &FRAME_SIGNATURE[..20];
        let result = extract_frames(bits);
        assert!(result.frames.is_empty());
        assert_eq!(result.remaining, bits);
    }

    #[test]
    fn test_truncated_frame_waits_with_cursor_unchanged() {
        let full = build_frame(b"truncate me");
        // Every strict prefix must come back byte-identical with no frames.
        for cut in [10, SIGNATURE_BITS, SIGNATURE_BITS + 10, full.len() - 1] {
            let prefix = &full[..cut];
            let result = extract_frames(prefix);
            assert!(result.frames.is_empty(), "cut at {cut}");
            assert_eq!(result.remaining, prefix, "cut at {cut}");
        }
    }

    #[test]
    fn test_resumes_after_partial_then_complete() {
        let full = build_frame(b"two appends");
        let first = extract_frames(&full[..40]);
        assert!(first.frames.is_empty());

        let mut buffer = first.remaining;
        buffer.extend_from_slice(&full[40..]);
        let second = extract_frames(&buffer);
        assert_eq!(second.frames, vec![b"two appends".to_vec()]);
        assert!(second.remaining.is_empty());
    }

    #[test]
    fn test_oversized_length_single_bit_advance() {
        // Signature followed by a length field claiming 2 MiB, then a real
        // frame. The bogus match must be skipped one bit at a time and the
        // genuine frame still recovered.
        let mut bits = FRAME_SIGNATURE.to_vec();
        bits.extend(bytes_to_bits(&(2u32 * 1024 * 1024).to_be_bytes()));
        bits.extend(build_frame(b"survivor"));

        let result = extract_frames(&bits);
        assert_eq!(result.frames, vec![b"survivor".to_vec()]);
        assert!(result.remaining.is_empty());
    }

    #[test]
    fn test_limit_below_protocol_max() {
        let payload = vec![0x5A; 512];
        let bits = build_frame(&payload);

        let tight = extract_frames_with_limit(&bits, 256);
        assert!(tight.frames.is_empty());

        let loose = extract_frames_with_limit(&bits, 512);
        assert_eq!(loose.frames, vec![payload]);
    }

    #[test]
    fn test_checksum_mismatch_recovers_embedded_frame() {
        // Outer frame carries a genuine inner frame as its payload but a
        // corrupted checksum. Rejecting the outer match with a one-bit
        // advance must still discover the inner signature.
        let inner = build_frame(b"inner");
        let inner_bytes = crate::bits::bits_to_bytes(&inner);
        // inner bit count is a multiple of 8, so no bits are lost here
        assert_eq!(inner_bytes.len() * 8, inner.len());

        let mut outer = build_frame(&inner_bytes);
        let last = outer.len() - 1;
        outer[last] ^= 1; // corrupt the outer CRC field

        let result = extract_frames(&outer);
        assert_eq!(result.frames, vec![b"inner".to_vec()]);
    }

    #[test]
    fn test_corrupted_payload_bit_rejected() {
        let mut bits = build_frame(&[0u8; 20]);
        let flip = SIGNATURE_BITS + LENGTH_BITS + 80; // mid-payload
        bits[flip] ^= 1;

        let result = extract_frames(&bits);
        assert!(result.frames.is_empty());
    }

    #[test]
    fn test_multiple_frames_in_order() {
        let mut bits = build_frame(b"first");
        bits.extend(build_frame(b"second"));
        bits.extend(build_frame(b"third"));

        let result = extract_frames(&bits);
        assert_eq!(
            result.frames,
            vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]
        );
        assert!(result.remaining.is_empty());
    }

    #[test]
    fn test_remaining_is_strict_suffix() {
        let mut bits = vec![1, 1, 0, 1, 0, 0, 1];
        bits.extend(build_frame(b"x"));
        bits.extend([1, 0, 1]);

        let result = extract_frames(&bits);
        assert_eq!(result.frames, vec![b"x".to_vec()]);
        let suffix_start = bits.len() - result.remaining.len();
        assert_eq!(&bits[suffix_start..], &result.remaining[..]);
    }
}
