use crate::structures::memory_block::Bytes;
use serde::{Deserialize, Serialize};

/// The closed set of relational predicates a scan or filter can apply.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum OpType {
    Eq,
    Neq,
    Gt,
    Lt,
    Ge,
    Le,
    Within(Bytes, Bytes),
    Changed,
    Unchanged,
    Increased,
    Decreased,
    Any,
}

impl OpType {
    /// Whether this operator needs a reference value to compare against
    /// (value-directed scans), as opposed to only comparing current vs.
    /// previous snapshot bytes.
    pub fn needs_reference_value(&self) -> bool {
        !matches!(
            self,
            OpType::Changed | OpType::Unchanged | OpType::Increased | OpType::Decreased | OpType::Any
        )
    }
}
