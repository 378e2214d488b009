use crate::structures::scan_type::ScanType;
use crate::structures::scanning::op_type::OpType;
use thiserror::Error;

/// The error taxonomy shared by every core component. Per-candidate read
/// failures are absorbed by the caller (the candidate is dropped, the pass
/// continues); everything else aborts the current operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("no process is currently selected")]
    ProcessNotSelected,

    #[error("no such process")]
    NoSuchProcess,

    #[error("permission denied")]
    PermissionDenied,

    #[error("failed to read {1} bytes at 0x{0:x}")]
    ReadFailed(u64, usize),

    #[error("failed to write {1} bytes at 0x{0:x}")]
    WriteFailed(u64, usize),

    #[error("failed to parse: {0}")]
    ParseError(String),

    #[error("operator {0:?} is not supported for scan type {1:?}")]
    UnsupportedOperator(OpType, ScanType),

    #[error("no selection to operate on")]
    EmptySelection,
}
