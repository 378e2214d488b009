use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed set of value interpretations the codec and scanners understand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ScanType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    ByteArray,
}

impl ScanType {
    /// Byte width of a value of this type, or `None` when the width is
    /// carried on the value itself (`String`, `ByteArray`).
    pub fn width(self) -> Option<usize> {
        match self {
            ScanType::Int8 => Some(1),
            ScanType::Int16 => Some(2),
            ScanType::Int32 => Some(4),
            ScanType::Int64 => Some(8),
            ScanType::Float32 => Some(4),
            ScanType::Float64 => Some(8),
            ScanType::String | ScanType::ByteArray => None,
        }
    }

    pub fn is_floating_point(self) -> bool {
        matches!(self, ScanType::Float32 | ScanType::Float64)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ScanType::String | ScanType::ByteArray)
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            ScanType::Int8 => "int8",
            ScanType::Int16 => "int16",
            ScanType::Int32 => "int32",
            ScanType::Int64 => "int64",
            ScanType::Float32 => "float32",
            ScanType::Float64 => "float64",
            ScanType::String => "string",
            ScanType::ByteArray => "bytearray",
        }
    }
}

impl FromStr for ScanType {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "int8" | "i8" => Ok(ScanType::Int8),
            "int16" | "i16" => Ok(ScanType::Int16),
            "int32" | "i32" => Ok(ScanType::Int32),
            "int64" | "i64" => Ok(ScanType::Int64),
            "float32" | "f32" | "float" => Ok(ScanType::Float32),
            "float64" | "f64" | "double" => Ok(ScanType::Float64),
            "string" | "str" => Ok(ScanType::String),
            "bytearray" | "aob" | "bytes" => Ok(ScanType::ByteArray),
            _ => Err(format!("unknown scan type: {}", input)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_round_trips_through_from_str() {
        for scan_type in [
            ScanType::Int8,
            ScanType::Int16,
            ScanType::Int32,
            ScanType::Int64,
            ScanType::Float32,
            ScanType::Float64,
            ScanType::String,
            ScanType::ByteArray,
        ] {
            let parsed: ScanType = scan_type.wire_name().parse().unwrap();
            assert_eq!(parsed, scan_type);
        }
    }

    #[test]
    fn numeric_types_report_a_fixed_width() {
        assert_eq!(ScanType::Int32.width(), Some(4));
        assert_eq!(ScanType::String.width(), None);
    }
}
