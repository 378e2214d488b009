pub mod scan_expression_parser;

pub use scan_expression_parser::{BytePattern, ScanExpressionParser};
