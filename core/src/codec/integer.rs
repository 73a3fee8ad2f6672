//! Integer encoders
//!
//! Fixed-width integers are written big-endian in exactly `bits / 8` bytes.
//! Arbitrary-precision integers use the minimal byte form that the chain's
//! interpreter produces for its unbounded `Int` and `UInt` types.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{CoreError, Result};

/// Parse a decimal integer literal of the form `-?[0-9]+`
pub fn parse_integer(value: &str) -> Result<BigInt> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidIntegerError { value: value.to_string() });
    }

    BigInt::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| CoreError::InvalidIntegerError { value: value.to_string() })
}

/// Label of a fixed-width integer type, e.g. `Int16` or `UInt64`
pub fn fixed_label(bits: u32, signed: bool) -> String {
    if signed {
        format!("Int{}", bits)
    } else {
        format!("UInt{}", bits)
    }
}

/// Encode a decimal literal as a fixed-width big-endian integer
///
/// # Arguments
///
/// * `bits` - Declared width, one of 8, 16, 32 or 64
/// * `signed` - Whether the type is two's complement
/// * `value` - Decimal literal; a leading `-` is accepted
///
/// # Returns
///
/// Exactly `bits / 8` bytes, or `OutOfRangeError` if the value does not fit
pub fn encode_fixed(bits: u32, signed: bool, value: &str) -> Result<Vec<u8>> {
    if !matches!(bits, 8 | 16 | 32 | 64) {
        return Err(CoreError::UnsupportedTypeError(fixed_label(bits, signed)));
    }

    let n = parse_integer(value)?;
    write_fixed(bits, signed, &n).ok_or_else(|| CoreError::OutOfRangeError {
        type_label: fixed_label(bits, signed),
        value: value.to_string(),
    })
}

/// Inclusive bounds of a fixed-width integer type
fn fixed_bounds(bits: u32, signed: bool) -> (BigInt, BigInt) {
    if signed {
        let half = BigInt::one() << (bits - 1);
        (-half.clone(), half - BigInt::one())
    } else {
        (BigInt::zero(), (BigInt::one() << bits) - BigInt::one())
    }
}

/// Write an already-parsed integer at a fixed width, `None` if it does not fit
pub(crate) fn write_fixed(bits: u32, signed: bool, n: &BigInt) -> Option<Vec<u8>> {
    let (min, max) = fixed_bounds(bits, signed);
    if n < &min || n > &max {
        return None;
    }

    // Every 64-bit value, signed or not, fits in an i128; truncating its
    // two's-complement form to the declared width keeps the same bit pattern.
    let wide = n.to_i128()?;
    let width = (bits / 8) as usize;
    Some(wide.to_be_bytes()[16 - width..].to_vec())
}

/// Encode a decimal literal as an arbitrary-precision integer
///
/// Unsigned values must be non-negative and fail with `OutOfRangeError`
/// otherwise.
pub fn encode_big(signed: bool, value: &str) -> Result<Vec<u8>> {
    let n = parse_integer(value)?;

    if signed {
        return Ok(signed_minimal_bytes(&n));
    }

    if n.is_negative() {
        return Err(CoreError::OutOfRangeError {
            type_label: "UInt".to_string(),
            value: value.to_string(),
        });
    }

    Ok(unsigned_minimal_bytes(n.magnitude()))
}

/// Minimal big-endian bytes of an unsigned value; zero is a single `0x00`
pub fn unsigned_minimal_bytes(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        return vec![0x00];
    }

    n.to_bytes_be()
}

/// Minimal two's-complement big-endian bytes of a signed value
///
/// Positive values get a leading `0x00` when their top bit is set. Negative
/// values are complemented over the magnitude's byte length and get a leading
/// `0xFF` when the top bit of the result is clear.
pub fn signed_minimal_bytes(n: &BigInt) -> Vec<u8> {
    match n.sign() {
        Sign::NoSign => vec![0x00],
        Sign::Plus => {
            let mut bytes = n.magnitude().to_bytes_be();
            if bytes[0] & 0x80 != 0 {
                bytes.insert(0, 0x00);
            }
            bytes
        }
        Sign::Minus => {
            let magnitude = n.magnitude();
            let byte_len = ((magnitude.bits() + 7) / 8) as usize;
            let modulus = BigUint::one() << (byte_len * 8);
            let complement = (modulus - magnitude).to_bytes_be();

            // The complement may be numerically shorter than the magnitude
            let mut bytes = vec![0x00; byte_len - complement.len()];
            bytes.extend_from_slice(&complement);

            if bytes[0] & 0x80 == 0 {
                bytes.insert(0, 0xFF);
            }
            bytes
        }
    }
}
