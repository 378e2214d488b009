use crate::codec::value_codec::ValueCodec;
use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::encoding_mode::EncodingMode;
use squalr_engine_api::structures::memory_block::Bytes;
use squalr_engine_api::structures::scan_type::ScanType;
use squalr_engine_api::structures::scanning::op_type::OpType;

/// A byte-array match pattern with wildcard slots (`None`), produced by the
/// composite-expression grammar.
pub type BytePattern = Vec<Option<u8>>;

/// Scan Expression Parser (C4): turns a user-typed query string into a
/// structured `(OpType, reference bytes)` pair the scanners can apply.
pub struct ScanExpressionParser;

impl ScanExpressionParser {
    /// Parses a scalar query: an optional relational prefix followed by a
    /// literal, a keyword naming a snapshot-only operator (`changed`,
    /// `unchanged`, `increased`, `decreased`, `any`), or a range `a..b` /
    /// `a,b` meaning `Within(a, b)`.
    pub fn parse(
        input: &str,
        scan_type: ScanType,
        encoding: EncodingMode,
    ) -> Result<(OpType, Bytes), EngineError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngineError::ParseError("scan expression cannot be empty".to_string()));
        }

        if let Some(op) = Self::parse_keyword(trimmed) {
            return Ok((op, Vec::new()));
        }

        if let Some((low, high)) = Self::split_range(trimmed) {
            let low_bytes = ValueCodec::encode(scan_type, low, encoding)?;
            let high_bytes = ValueCodec::encode(scan_type, high, encoding)?;
            return Ok((OpType::Within(low_bytes, high_bytes), Vec::new()));
        }

        let (op, rest) = Self::split_operator_prefix(trimmed);
        if !scan_type.is_numeric() && !matches!(op, OpType::Eq | OpType::Neq) {
            return Err(EngineError::UnsupportedOperator(op, scan_type));
        }

        let reference = ValueCodec::encode(scan_type, rest, encoding)?;
        Ok((op, reference))
    }

    /// Parses a composite byte-array pattern: whitespace/comma-separated hex
    /// byte tokens where `?` or `??` stands for "any byte at this offset".
    pub fn parse_pattern(input: &str) -> Result<BytePattern, EngineError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngineError::ParseError("byte pattern cannot be empty".to_string()));
        }

        trimmed
            .split(|ch: char| ch.is_whitespace() || ch == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                if token == "?" || token == "??" || token == "*" {
                    Ok(None)
                } else {
                    let token = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
                    u8::from_str_radix(token, 16)
                        .map(Some)
                        .map_err(|error| EngineError::ParseError(format!("invalid pattern token '{}': {}", token, error)))
                }
            })
            .collect()
    }

    pub fn matches_pattern(
        current: &[u8],
        pattern: &BytePattern,
    ) -> bool {
        current.len() == pattern.len()
            && current
                .iter()
                .zip(pattern.iter())
                .all(|(byte, expected)| expected.is_none_or(|expected| *expected == *byte))
    }

    fn parse_keyword(input: &str) -> Option<OpType> {
        match input.to_lowercase().as_str() {
            "changed" => Some(OpType::Changed),
            "unchanged" => Some(OpType::Unchanged),
            "increased" => Some(OpType::Increased),
            "decreased" => Some(OpType::Decreased),
            "any" | "*" => Some(OpType::Any),
            _ => None,
        }
    }

    fn split_range(input: &str) -> Option<(&str, &str)> {
        if let Some(index) = input.find("..") {
            return Some((input[..index].trim(), input[index + 2..].trim()));
        }

        let mut parts = input.splitn(2, ',');
        match (parts.next(), parts.next()) {
            (Some(low), Some(high)) => Some((low.trim(), high.trim())),
            _ => None,
        }
    }

    fn split_operator_prefix(input: &str) -> (OpType, &str) {
        const PREFIXES: [(&str, OpType); 6] = [
            ("!=", OpType::Neq),
            (">=", OpType::Ge),
            ("<=", OpType::Le),
            ("=", OpType::Eq),
            (">", OpType::Gt),
            ("<", OpType::Lt),
        ];

        for (prefix, op) in PREFIXES {
            if let Some(rest) = input.strip_prefix(prefix) {
                return (op, rest.trim());
            }
        }

        (OpType::Eq, input)
    }
}
