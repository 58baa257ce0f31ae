//! BER length field codec
//!
//! BER length can be encoded in three forms (X.690 §8.1.3):
//!
//! Short form, lengths 0-127:
//! ```text
//! Byte: 0 L L L L L L L
//! ```
//!
//! Long form, first octet announces how many big-endian length octets follow:
//! ```text
//! First byte:  1 N N N N N N N  (N = number of length bytes, 1-127)
//! Following bytes: L L L L L L L L
//! ```
//!
//! Indefinite form, the single octet `0x80`; the content is terminated by an
//! end-of-contents marker instead of a byte count. Only the parser knows
//! whether that is acceptable, so this module just reports it.

use ber_core::{BerError, BerResult};
use bytes::BufMut;

/// Octet announcing the indefinite length form
pub const INDEFINITE_LENGTH: u8 = 0x80;

/// Largest length encodable in short form
pub const MAX_SHORT_LENGTH: usize = 0x7F;

/// Decoded length field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Explicit byte count (short or long form)
    Definite(usize),
    /// Content runs until an end-of-contents marker
    Indefinite,
}

impl BerLength {
    /// Get the byte count, `None` for the indefinite form
    pub fn definite(&self) -> Option<usize> {
        match self {
            BerLength::Definite(length) => Some(*length),
            BerLength::Indefinite => None,
        }
    }

    pub fn is_indefinite(&self) -> bool {
        matches!(self, BerLength::Indefinite)
    }
}

/// Decode the length field starting at `offset`
///
/// Returns the decoded length and the number of octets the field occupies.
/// Offsets in errors are positions in `buffer`.
///
/// # Errors
/// - `OutOfData(offset, 1)` when there is no octet at `offset`
/// - `OutOfData(offset + 1, n)` when a long form announces more octets than remain
/// - `InvalidValue` when a long-form value does not fit in `usize`
pub fn decode_length(buffer: &[u8], offset: usize) -> BerResult<(BerLength, usize)> {
    let first = *buffer
        .get(offset)
        .ok_or_else(|| BerError::out_of_data(offset, 1))?;

    if first & 0x80 == 0 {
        return Ok((BerLength::Definite(first as usize), 1));
    }

    if first == INDEFINITE_LENGTH {
        return Ok((BerLength::Indefinite, 1));
    }

    // X.690 §8.1.3.5 reserves 0xFF
    if first == 0xFF {
        return Err(BerError::InvalidValue(format!(
            "Reserved length octet 0xFF at offset {}",
            offset
        )));
    }

    let num_octets = (first & 0x7F) as usize;
    let start = offset + 1;
    let octets = buffer
        .get(start..start + num_octets)
        .ok_or_else(|| BerError::out_of_data(start, num_octets))?;

    let mut length = 0usize;
    for &octet in octets {
        length = length
            .checked_mul(256)
            .map(|value| value | octet as usize)
            .ok_or_else(|| {
                BerError::InvalidValue(format!(
                    "Length at offset {} does not fit in {} bytes",
                    offset,
                    std::mem::size_of::<usize>()
                ))
            })?;
    }

    Ok((BerLength::Definite(length), 1 + num_octets))
}

/// Number of octets `encode_length(length)` produces
pub fn length_field_size(length: usize) -> usize {
    if length <= MAX_SHORT_LENGTH {
        1
    } else {
        1 + significant_octets(length)
    }
}

/// Encode a definite length using the shortest form
///
/// Lengths up to 127 use one octet, anything larger uses the long form with
/// a minimal big-endian value (no leading zero octets).
pub fn encode_length(length: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(length_field_size(length));
    encode_length_into(length, &mut out);
    out
}

/// Append the encoded length to a buffer
pub fn encode_length_into<B: BufMut>(length: usize, buf: &mut B) {
    if length <= MAX_SHORT_LENGTH {
        buf.put_u8(length as u8);
        return;
    }

    let count = significant_octets(length);
    buf.put_u8(0x80 | count as u8);
    let be = length.to_be_bytes();
    buf.put_slice(&be[be.len() - count..]);
}

fn significant_octets(value: usize) -> usize {
    let bits = usize::BITS - value.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_boundaries() {
        assert_eq!(encode_length(0), vec![0x00]);
        assert_eq!(encode_length(127), vec![0x7F]);
        assert_eq!(encode_length(128), vec![0x81, 0x80]);
        assert_eq!(encode_length(255), vec![0x81, 0xFF]);
        assert_eq!(encode_length(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(encode_length(0x0102_0304), vec![0x84, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_length_field_size_matches_encoding() {
        for length in [0, 1, 127, 128, 255, 256, 65_535, 65_536, 1 << 24, usize::MAX] {
            assert_eq!(length_field_size(length), encode_length(length).len());
        }
    }

    #[test]
    fn test_decode_short_and_long() {
        assert_eq!(decode_length(&[0x05], 0).unwrap(), (BerLength::Definite(5), 1));
        assert_eq!(
            decode_length(&[0x30, 0x82, 0x01, 0x00], 1).unwrap(),
            (BerLength::Definite(256), 3)
        );
    }

    #[test]
    fn test_decode_inverts_encode() {
        for length in [0, 100, 127, 128, 1000, 70_000, 1 << 31] {
            let encoded = encode_length(length);
            let (decoded, consumed) = decode_length(&encoded, 0).unwrap();
            assert_eq!(decoded, BerLength::Definite(length));
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn test_decode_non_minimal_long_form() {
        assert_eq!(
            decode_length(&[0x82, 0x00, 0x05], 0).unwrap(),
            (BerLength::Definite(5), 3)
        );
    }

    #[test]
    fn test_decode_indefinite() {
        let (length, consumed) = decode_length(&[0x80], 0).unwrap();
        assert!(length.is_indefinite());
        assert_eq!(length.definite(), None);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_decode_missing_octets() {
        assert_eq!(decode_length(&[0x02], 1), Err(BerError::out_of_data(1, 1)));
        assert_eq!(
            decode_length(&[0x04, 0x83, 0x01], 1),
            Err(BerError::out_of_data(2, 3))
        );
    }

    #[test]
    fn test_decode_overflowing_length() {
        let mut data = vec![0x89];
        data.extend_from_slice(&[0xFF; 9]);
        assert!(matches!(decode_length(&data, 0), Err(BerError::InvalidValue(_))));
    }

    #[test]
    fn test_decode_reserved_octet() {
        assert!(matches!(decode_length(&[0xFF], 0), Err(BerError::InvalidValue(_))));
    }
}
