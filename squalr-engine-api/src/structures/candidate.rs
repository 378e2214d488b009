use crate::structures::address::Address;
use crate::structures::memory_block::Bytes;
use crate::structures::scan_type::ScanType;
use serde::{Deserialize, Serialize};

/// A tracked memory cell: either a freshly discovered scan hit or a row the
/// user has moved into the store list. Row indices into the owning list are
/// the identity the front-end uses to reference a candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub address: Address,
    pub scan_type: ScanType,
    pub last_value: Bytes,
    pub locked: bool,
    pub lock_value: Option<Bytes>,
    pub description: String,
}

impl Candidate {
    pub fn new(
        address: Address,
        scan_type: ScanType,
        last_value: Bytes,
    ) -> Self {
        Self {
            address,
            scan_type,
            last_value,
            locked: false,
            lock_value: None,
            description: String::new(),
        }
    }
}
