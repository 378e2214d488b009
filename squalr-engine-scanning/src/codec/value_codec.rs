use squalr_engine_api::conversions::Conversions;
use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::encoding_mode::EncodingMode;
use squalr_engine_api::structures::memory_block::Bytes;
use squalr_engine_api::structures::scan_type::ScanType;
use squalr_engine_api::structures::scanning::op_type::OpType;

/// A decoded numeric value kept in its native representation so integer
/// comparisons stay exact instead of rounding through `f64`.
#[derive(Clone, Copy, Debug)]
enum NumericValue {
    Int(i64),
    Float(f64),
}

impl PartialEq for NumericValue {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self, other) {
            (NumericValue::Int(a), NumericValue::Int(b)) => a == b,
            (NumericValue::Float(a), NumericValue::Float(b)) => a == b,
            (NumericValue::Int(a), NumericValue::Float(b)) => (*a as f64) == *b,
            (NumericValue::Float(a), NumericValue::Int(b)) => *a == (*b as f64),
        }
    }
}

impl PartialOrd for NumericValue {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (NumericValue::Int(a), NumericValue::Int(b)) => a.partial_cmp(b),
            (NumericValue::Float(a), NumericValue::Float(b)) => a.partial_cmp(b),
            (NumericValue::Int(a), NumericValue::Float(b)) => (*a as f64).partial_cmp(b),
            (NumericValue::Float(a), NumericValue::Int(b)) => a.partial_cmp(&(*b as f64)),
        }
    }
}

/// Type & Value Codec (C3): encodes typed literals to bytes and decodes or
/// compares bytes under a declared scan type.
pub struct ValueCodec;

impl ValueCodec {
    pub fn width(scan_type: ScanType) -> Option<usize> {
        scan_type.width()
    }

    /// Parses a user literal into the little-endian (or raw, for
    /// bytes/strings) byte encoding of `scan_type`.
    pub fn encode(
        scan_type: ScanType,
        literal: &str,
        encoding: EncodingMode,
    ) -> Result<Bytes, EngineError> {
        match scan_type {
            ScanType::Int8 => Ok((Self::parse_signed(literal)? as i8).to_le_bytes().to_vec()),
            ScanType::Int16 => Ok((Self::parse_signed(literal)? as i16).to_le_bytes().to_vec()),
            ScanType::Int32 => Ok((Self::parse_signed(literal)? as i32).to_le_bytes().to_vec()),
            ScanType::Int64 => Ok(Self::parse_signed(literal)?.to_le_bytes().to_vec()),
            ScanType::Float32 => {
                let value: f32 = literal
                    .trim()
                    .parse()
                    .map_err(|_| EngineError::ParseError(format!("'{}' is not a valid float32", literal)))?;
                Ok(value.to_le_bytes().to_vec())
            }
            ScanType::Float64 => {
                let value: f64 = literal
                    .trim()
                    .parse()
                    .map_err(|_| EngineError::ParseError(format!("'{}' is not a valid float64", literal)))?;
                Ok(value.to_le_bytes().to_vec())
            }
            ScanType::String => Self::encode_string(literal, encoding),
            ScanType::ByteArray => Self::parse_hex_bytes(literal),
        }
    }

    /// Decodes `bytes` (exactly `width(scan_type)` long for numeric types)
    /// back into its display string.
    pub fn decode_to_string(
        scan_type: ScanType,
        bytes: &[u8],
        encoding: EncodingMode,
    ) -> Result<String, EngineError> {
        let value = match scan_type {
            ScanType::Int8 => i8::from_le_bytes(Self::fixed::<1>(bytes)?).to_string(),
            ScanType::Int16 => i16::from_le_bytes(Self::fixed::<2>(bytes)?).to_string(),
            ScanType::Int32 => i32::from_le_bytes(Self::fixed::<4>(bytes)?).to_string(),
            ScanType::Int64 => i64::from_le_bytes(Self::fixed::<8>(bytes)?).to_string(),
            ScanType::Float32 => f32::from_le_bytes(Self::fixed::<4>(bytes)?).to_string(),
            ScanType::Float64 => f64::from_le_bytes(Self::fixed::<8>(bytes)?).to_string(),
            ScanType::String => Self::decode_string(bytes, encoding)?,
            ScanType::ByteArray => Self::format_hex_bytes(bytes),
        };

        Ok(value)
    }

    /// Applies `op` to `current` against `reference`. `reference` plays a
    /// dual role: a parsed literal for value-directed scans, or the prior
    /// snapshot's bytes for snapshot comparisons — both are just "the value
    /// to compare against".
    pub fn compare(
        scan_type: ScanType,
        current: &[u8],
        reference: &[u8],
        op: &OpType,
    ) -> Result<bool, EngineError> {
        if matches!(op, OpType::Any) {
            return Ok(true);
        }

        if !scan_type.is_numeric() {
            return Self::compare_bytes(scan_type, current, reference, op);
        }

        let (current_value, reference_value) = (Self::decode_numeric(scan_type, current)?, Self::decode_numeric(scan_type, reference)?);

        match op {
            OpType::Eq | OpType::Unchanged => Ok(current_value == reference_value),
            OpType::Neq | OpType::Changed => Ok(current_value != reference_value),
            OpType::Gt | OpType::Increased => Ok(current_value > reference_value),
            OpType::Lt | OpType::Decreased => Ok(current_value < reference_value),
            OpType::Ge => Ok(current_value >= reference_value),
            OpType::Le => Ok(current_value <= reference_value),
            OpType::Within(low, high) => {
                let low = Self::decode_numeric(scan_type, low)?;
                let high = Self::decode_numeric(scan_type, high)?;
                Ok(current_value >= low && current_value <= high)
            }
            OpType::Any => unreachable!("handled above"),
        }
    }

    fn compare_bytes(
        scan_type: ScanType,
        current: &[u8],
        reference: &[u8],
        op: &OpType,
    ) -> Result<bool, EngineError> {
        match op {
            OpType::Eq | OpType::Unchanged => Ok(current == reference),
            OpType::Neq | OpType::Changed => Ok(current != reference),
            unsupported => Err(EngineError::UnsupportedOperator(unsupported.clone(), scan_type)),
        }
    }

    /// Decodes to an integer-or-float value, keeping integers as `i64` so
    /// that `Int64` magnitudes above 2^53 are compared exactly rather than
    /// rounded through `f64`.
    fn decode_numeric(
        scan_type: ScanType,
        bytes: &[u8],
    ) -> Result<NumericValue, EngineError> {
        let value = match scan_type {
            ScanType::Int8 => NumericValue::Int(i8::from_le_bytes(Self::fixed::<1>(bytes)?) as i64),
            ScanType::Int16 => NumericValue::Int(i16::from_le_bytes(Self::fixed::<2>(bytes)?) as i64),
            ScanType::Int32 => NumericValue::Int(i32::from_le_bytes(Self::fixed::<4>(bytes)?) as i64),
            ScanType::Int64 => NumericValue::Int(i64::from_le_bytes(Self::fixed::<8>(bytes)?)),
            ScanType::Float32 => NumericValue::Float(f32::from_le_bytes(Self::fixed::<4>(bytes)?) as f64),
            ScanType::Float64 => NumericValue::Float(f64::from_le_bytes(Self::fixed::<8>(bytes)?)),
            ScanType::String | ScanType::ByteArray => {
                return Err(EngineError::ParseError("non-numeric scan type has no numeric value".to_string()));
            }
        };

        Ok(value)
    }

    fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], EngineError> {
        bytes
            .try_into()
            .map_err(|_| EngineError::ParseError(format!("expected {} bytes, got {}", N, bytes.len())))
    }

    fn parse_signed(literal: &str) -> Result<i64, EngineError> {
        Conversions::parse_signed_delta(literal).map_err(EngineError::ParseError)
    }

    fn encode_string(
        literal: &str,
        encoding: EncodingMode,
    ) -> Result<Bytes, EngineError> {
        match encoding {
            EncodingMode::Utf8 => Ok(literal.as_bytes().to_vec()),
            EncodingMode::Latin1 => literal
                .chars()
                .map(|ch| u8::try_from(ch as u32).map_err(|_| EngineError::ParseError(format!("'{}' is not representable in latin-1", ch))))
                .collect(),
        }
    }

    fn decode_string(
        bytes: &[u8],
        encoding: EncodingMode,
    ) -> Result<String, EngineError> {
        match encoding {
            EncodingMode::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|error| EngineError::ParseError(error.to_string())),
            EncodingMode::Latin1 => Ok(bytes.iter().map(|&byte| byte as char).collect()),
        }
    }

    /// Accepts either a compact hex string (`"DEADBEEF"`, optionally
    /// `0x`-prefixed) or a whitespace/comma-separated token list
    /// (`"DE AD BE EF"`).
    fn parse_hex_bytes(value_string: &str) -> Result<Bytes, EngineError> {
        let trimmed = value_string.trim();
        if trimmed.is_empty() {
            return Err(EngineError::ParseError("byte array pattern cannot be empty".to_string()));
        }

        let separators = |ch: char| ch.is_whitespace() || ch == ',';
        let tokens: Vec<&str> = trimmed.split(separators).filter(|token| !token.is_empty()).collect();

        if tokens.len() <= 1 {
            let mut cleaned = trimmed;
            if let Some(stripped) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
                cleaned = stripped;
            }

            if cleaned.len() % 2 != 0 {
                return Err(EngineError::ParseError("hex string length must be even".to_string()));
            }

            return cleaned
                .as_bytes()
                .chunks(2)
                .map(|chunk| {
                    let hex_pair = std::str::from_utf8(chunk).map_err(|_| EngineError::ParseError("invalid UTF-8 in hex string".to_string()))?;
                    u8::from_str_radix(hex_pair, 16).map_err(|error| EngineError::ParseError(format!("failed to parse hex byte '{}': {}", hex_pair, error)))
                })
                .collect();
        }

        tokens
            .into_iter()
            .map(|token| {
                let token = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
                let token = if token.len() == 1 { format!("0{}", token) } else { token.to_string() };
                u8::from_str_radix(&token, 16).map_err(|error| EngineError::ParseError(format!("invalid byte array token '{}': {}", token, error)))
            })
            .collect()
    }

    fn format_hex_bytes(value_bytes: &[u8]) -> String {
        value_bytes.iter().map(|value| format!("{:02X}", value)).collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_round_trip_for_every_numeric_type() {
        for (scan_type, literal) in [
            (ScanType::Int8, "-12"),
            (ScanType::Int16, "-1000"),
            (ScanType::Int32, "123456"),
            (ScanType::Int64, "-123456789"),
        ] {
            let encoded = ValueCodec::encode(scan_type, literal, EncodingMode::Utf8).unwrap();
            let decoded = ValueCodec::decode_to_string(scan_type, &encoded, EncodingMode::Utf8).unwrap();
            assert_eq!(decoded, literal);
        }

        let f32_encoded = ValueCodec::encode(ScanType::Float32, "3.5", EncodingMode::Utf8).unwrap();
        assert_eq!(ValueCodec::decode_to_string(ScanType::Float32, &f32_encoded, EncodingMode::Utf8).unwrap(), "3.5");
    }

    #[test]
    fn comparison_totality_holds_for_supported_pairs() {
        let a = ValueCodec::encode(ScanType::Int32, "10", EncodingMode::Utf8).unwrap();
        let b = ValueCodec::encode(ScanType::Int32, "20", EncodingMode::Utf8).unwrap();
        assert!(ValueCodec::compare(ScanType::Int32, &a, &b, &OpType::Lt).unwrap());
        assert!(!ValueCodec::compare(ScanType::Int32, &a, &b, &OpType::Gt).unwrap());
        assert!(ValueCodec::compare(ScanType::Int32, &a, &a, &OpType::Eq).unwrap());
    }

    #[test]
    fn int64_comparison_is_exact_above_f64_precision() {
        let a = ValueCodec::encode(ScanType::Int64, "9007199254740993", EncodingMode::Utf8).unwrap();
        let b = ValueCodec::encode(ScanType::Int64, "9007199254740992", EncodingMode::Utf8).unwrap();

        assert!(!ValueCodec::compare(ScanType::Int64, &a, &b, &OpType::Eq).unwrap());
        assert!(ValueCodec::compare(ScanType::Int64, &a, &b, &OpType::Gt).unwrap());
    }

    #[test]
    fn unsupported_operator_on_byte_array_is_rejected() {
        let a = ValueCodec::encode(ScanType::ByteArray, "DE AD", EncodingMode::Utf8).unwrap();
        let b = ValueCodec::encode(ScanType::ByteArray, "BE EF", EncodingMode::Utf8).unwrap();
        let result = ValueCodec::compare(ScanType::ByteArray, &a, &b, &OpType::Gt);
        assert!(matches!(result, Err(EngineError::UnsupportedOperator(_, _))));
    }

    #[test]
    fn parse_hex_bytes_accepts_token_list_and_compact_form() {
        assert_eq!(ValueCodec::encode(ScanType::ByteArray, "DE AD BE EF", EncodingMode::Utf8).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(ValueCodec::encode(ScanType::ByteArray, "0xDEADBEEF", EncodingMode::Utf8).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn latin1_string_round_trips_byte_for_byte() {
        let encoded = ValueCodec::encode(ScanType::String, "hi", EncodingMode::Latin1).unwrap();
        assert_eq!(encoded, vec![b'h', b'i']);
        assert_eq!(ValueCodec::decode_to_string(ScanType::String, &encoded, EncodingMode::Latin1).unwrap(), "hi");
    }
}
