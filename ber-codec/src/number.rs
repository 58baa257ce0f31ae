//! INTEGER and REAL content octets
//!
//! Native numbers are converted to the X.690 content encodings, never to the
//! host's in-memory layout:
//!
//! - INTEGER (§8.3): big-endian two's complement, minimal length
//! - REAL (§8.5): empty for +0, one special octet for -0, ±infinity and NaN,
//!   otherwise the binary form with base 2, scale factor 0 and an odd
//!   mantissa. Decimal (ISO 6093) content is accepted when decoding.

use crate::node::ValueNode;
use ber_core::{BerError, BerResult, Encoding, TagClass, TagType};

const REAL_PLUS_INFINITY: u8 = 0x40;
const REAL_MINUS_INFINITY: u8 = 0x41;
const REAL_NOT_A_NUMBER: u8 = 0x42;
const REAL_MINUS_ZERO: u8 = 0x43;

/// Encode an integer as minimal big-endian two's complement
pub fn encode_integer(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    // Drop leading octets that only repeat the sign of the next one
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = match bytes[start] {
            0x00 => bytes[start + 1] & 0x80 == 0,
            0xFF => bytes[start + 1] & 0x80 != 0,
            _ => false,
        };
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

/// Decode big-endian two's complement content into an `i64`
///
/// # Errors
/// Returns `InvalidValue` for empty content or more than 8 octets.
pub fn decode_integer(bytes: &[u8]) -> BerResult<i64> {
    if bytes.is_empty() {
        return Err(BerError::InvalidValue("Empty integer encoding".to_string()));
    }
    if bytes.len() > 8 {
        return Err(BerError::InvalidValue(format!(
            "Integer too large: {} bytes (max 8)",
            bytes.len()
        )));
    }

    let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(i64::from_be_bytes(buf))
}

/// Encode a floating-point value as REAL content octets
pub fn encode_real(value: f64) -> Vec<u8> {
    if value.is_nan() {
        return vec![REAL_NOT_A_NUMBER];
    }
    if value.is_infinite() {
        let octet = if value > 0.0 {
            REAL_PLUS_INFINITY
        } else {
            REAL_MINUS_INFINITY
        };
        return vec![octet];
    }
    if value == 0.0 {
        return if value.is_sign_negative() {
            vec![REAL_MINUS_ZERO]
        } else {
            Vec::new()
        };
    }

    let bits = value.to_bits();
    let negative = bits >> 63 != 0;
    let biased_exponent = ((bits >> 52) & 0x7FF) as i64;
    let fraction = bits & ((1 << 52) - 1);

    let (mut mantissa, mut exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased_exponent - 1075)
    };
    let shift = mantissa.trailing_zeros();
    mantissa >>= shift;
    exponent += shift as i64;

    let exponent_octets = encode_integer(exponent);
    // Binary form, base 2, scale 0; exponent fits in 1 or 2 octets
    let mut first = 0x80 | (exponent_octets.len() as u8 - 1);
    if negative {
        first |= 0x40;
    }

    let mantissa_bytes = mantissa.to_be_bytes();
    let skip = mantissa.leading_zeros() as usize / 8;

    let mut out = Vec::with_capacity(1 + exponent_octets.len() + 8 - skip);
    out.push(first);
    out.extend_from_slice(&exponent_octets);
    out.extend_from_slice(&mantissa_bytes[skip..]);
    out
}

/// Decode REAL content octets into an `f64`
///
/// # Errors
/// Returns `InvalidValue` for reserved bases or special values, truncated
/// exponents, mantissas wider than 64 bits and unparsable decimal forms.
pub fn decode_real(bytes: &[u8]) -> BerResult<f64> {
    let Some((&first, rest)) = bytes.split_first() else {
        return Ok(0.0);
    };

    if first & 0x80 != 0 {
        return decode_binary_real(first, rest);
    }

    if first & 0x40 != 0 {
        return match first {
            REAL_PLUS_INFINITY => Ok(f64::INFINITY),
            REAL_MINUS_INFINITY => Ok(f64::NEG_INFINITY),
            REAL_NOT_A_NUMBER => Ok(f64::NAN),
            REAL_MINUS_ZERO => Ok(-0.0),
            other => Err(BerError::InvalidValue(format!(
                "Unknown special real value 0x{:02X}",
                other
            ))),
        };
    }

    // Decimal form: NR1, NR2 or NR3 (ISO 6093) as ASCII text
    let text = std::str::from_utf8(rest)
        .map_err(|_| BerError::InvalidValue("Decimal real is not ASCII".to_string()))?;
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| BerError::InvalidValue(format!("Invalid decimal real {:?}: {}", text, e)))
}

fn decode_binary_real(first: u8, rest: &[u8]) -> BerResult<f64> {
    let negative = first & 0x40 != 0;
    let base_bits: i64 = match (first >> 4) & 0x03 {
        0 => 1,
        1 => 3,
        2 => 4,
        _ => {
            return Err(BerError::InvalidValue(
                "Reserved base in binary real".to_string(),
            ));
        }
    };
    let scale = ((first >> 2) & 0x03) as i64;

    let (exponent_len, rest) = match first & 0x03 {
        3 => {
            let (&len, rest) = rest.split_first().ok_or_else(|| {
                BerError::InvalidValue("Missing real exponent length".to_string())
            })?;
            (len as usize, rest)
        }
        format => (format as usize + 1, rest),
    };
    if rest.len() < exponent_len {
        return Err(BerError::InvalidValue("Truncated real exponent".to_string()));
    }
    let (exponent_bytes, mantissa_bytes) = rest.split_at(exponent_len);
    let exponent = decode_integer(exponent_bytes)?;

    let significant = {
        let zeros = mantissa_bytes.iter().take_while(|b| **b == 0).count();
        &mantissa_bytes[zeros..]
    };
    if significant.len() > 8 {
        return Err(BerError::InvalidValue(format!(
            "Real mantissa too large: {} bytes (max 8)",
            significant.len()
        )));
    }
    let mantissa = significant
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64);

    // value = mantissa * 2^scale * base^exponent, with base = 2^base_bits
    let power = exponent
        .checked_mul(base_bits)
        .and_then(|p| p.checked_add(scale))
        .ok_or_else(|| BerError::InvalidValue("Real exponent overflow".to_string()))?;
    let magnitude = scale_by_power_of_two(mantissa as f64, power);
    Ok(if negative { -magnitude } else { magnitude })
}

/// Multiply by 2^power without overflowing intermediate powers
fn scale_by_power_of_two(mut value: f64, power: i64) -> f64 {
    let mut remaining = power.clamp(-4000, 4000);
    while remaining != 0 && value != 0.0 && value.is_finite() {
        let step = remaining.clamp(-1000, 1000);
        value *= f64::from_bits(((step + 1023) as u64) << 52);
        remaining -= step;
    }
    value
}

impl ValueNode {
    /// Create an INTEGER node from a native integer
    pub fn from_i64(tag_class: TagClass, value: i64) -> Self {
        ValueNode::build(
            tag_class,
            TagType::Integer,
            Encoding::Primitive,
            encode_integer(value).into(),
        )
    }

    /// Create a REAL node from a native floating-point value
    pub fn from_f64(tag_class: TagClass, value: f64) -> Self {
        ValueNode::build(
            tag_class,
            TagType::Real,
            Encoding::Primitive,
            encode_real(value).into(),
        )
    }

    pub fn from_f32(tag_class: TagClass, value: f32) -> Self {
        Self::from_f64(tag_class, value as f64)
    }

    /// Read the payload as INTEGER content
    pub fn to_i64(&self) -> BerResult<i64> {
        decode_integer(self.data())
    }

    /// Read the payload as REAL content
    pub fn to_f64(&self) -> BerResult<f64> {
        decode_real(self.data())
    }
}

impl From<i64> for ValueNode {
    fn from(value: i64) -> Self {
        ValueNode::from_i64(TagClass::Universal, value)
    }
}

impl From<f64> for ValueNode {
    fn from(value: f64) -> Self {
        ValueNode::from_f64(TagClass::Universal, value)
    }
}
