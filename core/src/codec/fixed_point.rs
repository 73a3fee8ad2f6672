//! Fixed-point decimal encoder
//!
//! `Fix64` and `UFix64` carry eight fractional digits. A literal is scaled by
//! 10^8 digit by digit, with no floating-point step, and the scaled integer is
//! written with the 64-bit fixed-width rule.

use num_bigint::{BigInt, BigUint, Sign};

use super::integer::write_fixed;
use crate::error::{CoreError, Result};

/// Number of fractional decimal digits carried by fixed-point types
pub const FIXED_POINT_DECIMALS: usize = 8;

fn invalid(value: &str, reason: impl Into<String>) -> CoreError {
    CoreError::InvalidFixedPointError {
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parse a decimal literal into its value scaled by 10^8
///
/// Accepts `-?[0-9]+(\.[0-9]{1,8})?`.
pub fn parse_fixed_point(value: &str) -> Result<BigInt> {
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let (integer_part, fraction_part) = match unsigned.split_once('.') {
        Some((integer, fraction)) => {
            if fraction.is_empty() {
                return Err(invalid(value, "fractional part is empty"));
            }
            (integer, fraction)
        }
        None => (unsigned, ""),
    };

    if integer_part.is_empty() || !integer_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(value, "integer part must be decimal digits"));
    }
    if !fraction_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(value, "fractional part must be decimal digits"));
    }
    if fraction_part.len() > FIXED_POINT_DECIMALS {
        return Err(invalid(
            value,
            format!(
                "at most {} fractional digits are allowed, got {}",
                FIXED_POINT_DECIMALS,
                fraction_part.len()
            ),
        ));
    }

    let mut digits = String::with_capacity(integer_part.len() + FIXED_POINT_DECIMALS);
    digits.push_str(integer_part);
    digits.push_str(fraction_part);
    for _ in fraction_part.len()..FIXED_POINT_DECIMALS {
        digits.push('0');
    }

    let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| invalid(value, "not a decimal numeral"))?;
    let sign = if negative { Sign::Minus } else { Sign::Plus };

    Ok(BigInt::from_biguint(sign, magnitude))
}

/// Encode a decimal literal as `Fix64` (signed) or `UFix64` (unsigned)
pub fn encode_fixed_point(signed: bool, value: &str) -> Result<Vec<u8>> {
    let scaled = parse_fixed_point(value)?;

    write_fixed(64, signed, &scaled).ok_or_else(|| CoreError::OutOfRangeError {
        type_label: if signed { "Fix64" } else { "UFix64" }.to_string(),
        value: value.to_string(),
    })
}
