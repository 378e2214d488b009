use crate::structures::address::Address;
use crate::structures::memory_block::Bytes;
use serde::{Deserialize, Serialize};

/// A candidate discovered by snapshot comparison rather than by a direct
/// value-directed sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotScan {
    pub address: Address,
    pub scanned_value: Bytes,
}

impl SnapshotScan {
    pub fn new(
        address: Address,
        scanned_value: Bytes,
    ) -> Self {
        Self { address, scanned_value }
    }
}
