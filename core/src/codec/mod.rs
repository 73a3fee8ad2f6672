//! Canonical value codec
//!
//! This module maps textual metadata values onto the byte form the chain's
//! interpreter produces for the same typed value. Hash equality between the
//! off-chain and on-chain computations depends on these bytes being exact.

mod fixed_point;
mod integer;

pub use fixed_point::{encode_fixed_point, parse_fixed_point, FIXED_POINT_DECIMALS};
pub use integer::{
    encode_big, encode_fixed, parse_integer, signed_minimal_bytes, unsigned_minimal_bytes,
};

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::error::{CoreError, Result};

/// Width in bytes of an account address on the chain
pub const ADDRESS_LENGTH: usize = 8;

/// Largest variable-length value a 2-byte length prefix can describe
pub const MAX_PREFIXED_LENGTH: usize = u16::MAX as usize;

/// Scalar type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// Arbitrary-precision signed integer
    Int,
    /// Arbitrary-precision unsigned integer
    UInt,
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,
    /// Signed fixed-point decimal with 8 fractional digits
    Fix64,
    /// Unsigned fixed-point decimal with 8 fractional digits
    UFix64,
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
    /// Account address
    Address,
}

/// Encoding rule a field type resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Big-endian integer of a fixed bit width
    Fixed {
        /// Width in bits
        bits: u32,
        /// Two's complement when true
        signed: bool,
    },
    /// Minimal arbitrary-precision integer
    Big {
        /// Two's complement when true
        signed: bool,
    },
    /// Decimal scaled by 10^8 into 64 bits
    FixedPoint {
        /// Two's complement when true
        signed: bool,
    },
    /// Raw UTF-8 bytes
    Utf8,
    /// Single `0x00` / `0x01` byte
    Bool,
    /// Hex-decoded address bytes
    Address,
}

impl FieldType {
    /// Every supported field type
    pub const ALL: [FieldType; 15] = [
        FieldType::Int,
        FieldType::UInt,
        FieldType::Int8,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::UInt8,
        FieldType::UInt16,
        FieldType::UInt32,
        FieldType::UInt64,
        FieldType::Fix64,
        FieldType::UFix64,
        FieldType::String,
        FieldType::Bool,
        FieldType::Address,
    ];

    /// Type label as written in schemas
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Int => "Int",
            FieldType::UInt => "UInt",
            FieldType::Int8 => "Int8",
            FieldType::Int16 => "Int16",
            FieldType::Int32 => "Int32",
            FieldType::Int64 => "Int64",
            FieldType::UInt8 => "UInt8",
            FieldType::UInt16 => "UInt16",
            FieldType::UInt32 => "UInt32",
            FieldType::UInt64 => "UInt64",
            FieldType::Fix64 => "Fix64",
            FieldType::UFix64 => "UFix64",
            FieldType::String => "String",
            FieldType::Bool => "Bool",
            FieldType::Address => "Address",
        }
    }

    /// Encoding rule for this type
    pub fn encoding(&self) -> Encoding {
        match self {
            FieldType::Int => Encoding::Big { signed: true },
            FieldType::UInt => Encoding::Big { signed: false },
            FieldType::Int8 => Encoding::Fixed { bits: 8, signed: true },
            FieldType::Int16 => Encoding::Fixed { bits: 16, signed: true },
            FieldType::Int32 => Encoding::Fixed { bits: 32, signed: true },
            FieldType::Int64 => Encoding::Fixed { bits: 64, signed: true },
            FieldType::UInt8 => Encoding::Fixed { bits: 8, signed: false },
            FieldType::UInt16 => Encoding::Fixed { bits: 16, signed: false },
            FieldType::UInt32 => Encoding::Fixed { bits: 32, signed: false },
            FieldType::UInt64 => Encoding::Fixed { bits: 64, signed: false },
            FieldType::Fix64 => Encoding::FixedPoint { signed: true },
            FieldType::UFix64 => Encoding::FixedPoint { signed: false },
            FieldType::String => Encoding::Utf8,
            FieldType::Bool => Encoding::Bool,
            FieldType::Address => Encoding::Address,
        }
    }

    /// Encoded length implied by the type, `None` for variable-length types
    pub fn fixed_length(&self) -> Option<usize> {
        match self.encoding() {
            Encoding::Fixed { bits, .. } => Some((bits / 8) as usize),
            Encoding::FixedPoint { .. } => Some(8),
            Encoding::Bool => Some(1),
            Encoding::Address => Some(ADDRESS_LENGTH),
            Encoding::Big { .. } | Encoding::Utf8 => None,
        }
    }

    /// Whether values of this type need a length prefix inside a preimage
    pub fn is_variable_length(&self) -> bool {
        self.fixed_length().is_none()
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(label: &str) -> Result<Self> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.label() == label)
            .ok_or_else(|| CoreError::UnsupportedTypeError(label.to_string()))
    }
}

impl TryFrom<String> for FieldType {
    type Error = CoreError;

    fn try_from(label: String) -> Result<Self> {
        label.parse()
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.label().to_string()
    }
}

/// Encode a value by its type, without any length prefix
pub fn encode_value(field_type: FieldType, value: &str) -> Result<Vec<u8>> {
    match field_type.encoding() {
        Encoding::Fixed { bits, signed } => encode_fixed(bits, signed, value),
        Encoding::Big { signed } => encode_big(signed, value),
        Encoding::FixedPoint { signed } => encode_fixed_point(signed, value),
        Encoding::Utf8 => Ok(value.as_bytes().to_vec()),
        Encoding::Bool => encode_bool(value),
        Encoding::Address => encode_address(value),
    }
}

/// Encode a value by its type label, e.g. `("UInt64", "42")`
pub fn encode_labeled(type_label: &str, value: &str) -> Result<Vec<u8>> {
    encode_value(type_label.parse()?, value)
}

/// Encode a value as one element of a multi-field preimage
///
/// Variable-length types (`Int`, `UInt`, `String`) are prefixed with their
/// length as a 2-byte big-endian integer. All other types are self-delimiting.
pub fn encode_field(field_type: FieldType, value: &str) -> Result<Vec<u8>> {
    let raw = encode_value(field_type, value)?;

    if field_type.is_variable_length() {
        length_prefixed(raw)
    } else {
        Ok(raw)
    }
}

/// Prepend a 2-byte big-endian length to a buffer
pub fn length_prefixed(raw: Vec<u8>) -> Result<Vec<u8>> {
    let length = u16::try_from(raw.len()).map_err(|_| CoreError::ValueTooLongError {
        length: raw.len(),
        max: MAX_PREFIXED_LENGTH,
    })?;

    let mut out = Vec::with_capacity(raw.len() + 2);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Encode `true` / `false` as a single byte
pub fn encode_bool(value: &str) -> Result<Vec<u8>> {
    match value {
        "true" => Ok(vec![0x01]),
        "false" => Ok(vec![0x00]),
        _ => Err(CoreError::InvalidBooleanError { value: value.to_string() }),
    }
}

/// Encode a hex address, with or without `0x`, as exactly 8 bytes
///
/// Short addresses are left-padded with zero bytes, matching how the chain
/// widens address literals such as `0x1`.
pub fn encode_address(value: &str) -> Result<Vec<u8>> {
    let invalid = |reason: String| CoreError::InvalidAddressError {
        value: value.to_string(),
        reason,
    };

    let digits = crate::utils::strip_hex_prefix(value);
    if digits.is_empty() {
        return Err(invalid("address is empty".to_string()));
    }

    let bytes = if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    }
    .map_err(|e| invalid(e.to_string()))?;

    if bytes.len() > ADDRESS_LENGTH {
        return Err(invalid(format!(
            "address is {} bytes, the maximum is {}",
            bytes.len(),
            ADDRESS_LENGTH
        )));
    }

    let mut out = vec![0u8; ADDRESS_LENGTH - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Int", "0", vec![0])]
    #[case("Int", "127", vec![127])]
    #[case("Int", "128", vec![0, 128])]
    #[case("Int", "-1", vec![255])]
    #[case("Int", "-200", vec![255, 56])]
    #[case("Int8", "-128", vec![128])]
    #[case("Int16", "-32768", vec![128, 0])]
    #[case("Int32", "-2147483648", vec![128, 0, 0, 0])]
    #[case("UInt", "200", vec![200])]
    #[case("UInt64", "18446744073709551615", vec![255, 255, 255, 255, 255, 255, 255, 255])]
    #[case("Fix64", "-1.0", vec![255, 255, 255, 255, 250, 10, 31, 0])]
    #[case("UFix64", "42.24", vec![0, 0, 0, 0, 251, 197, 32, 0])]
    fn test_reference_vectors(#[case] label: &str, #[case] value: &str, #[case] expected: Vec<u8>) {
        assert_eq!(encode_labeled(label, value).unwrap(), expected);
    }

    #[test]
    fn test_label_round_trip() {
        for field_type in FieldType::ALL {
            assert_eq!(field_type.label().parse::<FieldType>().unwrap(), field_type);
            assert_eq!(field_type.to_string(), field_type.label());
        }
    }

    #[rstest]
    #[case("Int128")]
    #[case("string")]
    #[case("Array")]
    #[case("")]
    fn test_unsupported_labels(#[case] label: &str) {
        match encode_labeled(label, "1") {
            Err(CoreError::UnsupportedTypeError(l)) => assert_eq!(l, label),
            other => panic!("Expected UnsupportedTypeError, got {:?}", other),
        }
    }

    #[test]
    fn test_field_type_serde_uses_labels() {
        let json = serde_json::to_string(&FieldType::UFix64).unwrap();
        assert_eq!(json, "\"UFix64\"");

        let parsed: FieldType = serde_json::from_str("\"Address\"").unwrap();
        assert_eq!(parsed, FieldType::Address);

        assert!(serde_json::from_str::<FieldType>("\"Word256\"").is_err());
    }

    #[test]
    fn test_encode_is_deterministic() {
        for field_type in [FieldType::Int, FieldType::String, FieldType::UFix64] {
            let value = match field_type {
                FieldType::String => "hello",
                FieldType::UFix64 => "1.25",
                _ => "-12345678901234567890",
            };
            assert_eq!(
                encode_value(field_type, value).unwrap(),
                encode_value(field_type, value).unwrap()
            );
        }
    }

    #[test]
    fn test_string_and_bool() {
        assert_eq!(encode_value(FieldType::String, "héllo").unwrap(), "héllo".as_bytes());
        assert_eq!(encode_value(FieldType::String, "").unwrap(), Vec::<u8>::new());
        assert_eq!(encode_value(FieldType::Bool, "true").unwrap(), vec![1]);
        assert_eq!(encode_value(FieldType::Bool, "false").unwrap(), vec![0]);

        for literal in ["True", "1", "yes", ""] {
            assert!(matches!(
                encode_value(FieldType::Bool, literal),
                Err(CoreError::InvalidBooleanError { .. })
            ));
        }
    }

    #[rstest]
    #[case("0xf8d6e0586b0a20c7", vec![0xf8, 0xd6, 0xe0, 0x58, 0x6b, 0x0a, 0x20, 0xc7])]
    #[case("f8d6e0586b0a20c7", vec![0xf8, 0xd6, 0xe0, 0x58, 0x6b, 0x0a, 0x20, 0xc7])]
    #[case("0x01", vec![0, 0, 0, 0, 0, 0, 0, 1])]
    #[case("0x1", vec![0, 0, 0, 0, 0, 0, 0, 1])]
    #[case("0x1cf0e2f2f715450", vec![0x01, 0xcf, 0x0e, 0x2f, 0x2f, 0x71, 0x54, 0x50])]
    fn test_encode_address(#[case] value: &str, #[case] expected: Vec<u8>) {
        assert_eq!(encode_value(FieldType::Address, value).unwrap(), expected);
    }

    #[rstest]
    #[case("0x")]
    #[case("0xzz")]
    #[case("0x0102030405060708ff")]
    fn test_encode_address_rejects(#[case] value: &str) {
        assert!(matches!(
            encode_value(FieldType::Address, value),
            Err(CoreError::InvalidAddressError { .. })
        ));
    }

    #[test]
    fn test_length_prefix_rule() {
        assert_eq!(encode_field(FieldType::String, "foo").unwrap(), vec![0, 3, b'f', b'o', b'o']);
        assert_eq!(encode_field(FieldType::Int, "128").unwrap(), vec![0, 2, 0, 128]);
        assert_eq!(encode_field(FieldType::UInt, "0").unwrap(), vec![0, 1, 0]);

        // Self-delimiting types are never prefixed
        assert_eq!(encode_field(FieldType::UInt8, "7").unwrap(), vec![7]);
        assert_eq!(encode_field(FieldType::Bool, "true").unwrap(), vec![1]);
        assert_eq!(encode_field(FieldType::UFix64, "0").unwrap(), vec![0; 8]);
        assert_eq!(encode_field(FieldType::Address, "0x1").unwrap().len(), ADDRESS_LENGTH);
    }

    #[test]
    fn test_fixed_length_matches_output() {
        let samples = [
            (FieldType::Int8, "1"),
            (FieldType::Int16, "1"),
            (FieldType::Int32, "1"),
            (FieldType::Int64, "1"),
            (FieldType::UInt8, "1"),
            (FieldType::UInt16, "1"),
            (FieldType::UInt32, "1"),
            (FieldType::UInt64, "1"),
            (FieldType::Fix64, "1.0"),
            (FieldType::UFix64, "1.0"),
            (FieldType::Bool, "true"),
            (FieldType::Address, "0xabc"),
        ];

        for (field_type, value) in samples {
            let encoded = encode_value(field_type, value).unwrap();
            assert_eq!(Some(encoded.len()), field_type.fixed_length(), "{}", field_type);
        }
    }

    #[test]
    fn test_value_too_long() {
        let long = "x".repeat(MAX_PREFIXED_LENGTH + 1);
        assert!(matches!(
            encode_field(FieldType::String, &long),
            Err(CoreError::ValueTooLongError { length, .. }) if length == MAX_PREFIXED_LENGTH + 1
        ));

        let max = "x".repeat(MAX_PREFIXED_LENGTH);
        assert_eq!(encode_field(FieldType::String, &max).unwrap()[..2], [0xff, 0xff]);
    }
}
