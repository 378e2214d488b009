use crate::structures::address::Address;
use serde::{Deserialize, Serialize};

/// An owned, length-prefixed byte buffer. Ownership is single-owner and
/// freed when its owner is dropped, which falls directly out of `Vec<u8>`.
pub type Bytes = Vec<u8>;

/// A contiguous, readable slice of the target's address space at a moment
/// in time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub base_address: Address,
    pub data: Bytes,
}

impl MemoryBlock {
    pub fn new(
        base_address: Address,
        data: Bytes,
    ) -> Self {
        Self { base_address, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn end_address(&self) -> Address {
        self.base_address + self.data.len() as Address
    }

    /// The `[overlap_start, overlap_end)` address range this block shares
    /// with `other`, if any.
    pub fn overlap_with(
        &self,
        other: &MemoryBlock,
    ) -> Option<(Address, Address)> {
        let overlap_start = self.base_address.max(other.base_address);
        let overlap_end = self.end_address().min(other.end_address());

        if overlap_end > overlap_start { Some((overlap_start, overlap_end)) } else { None }
    }
}

/// An ordered, non-overlapping (within one snapshot) sequence of memory
/// blocks, sorted by base address.
pub type MemoryBlocks = Vec<MemoryBlock>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_with_none_when_disjoint() {
        let a = MemoryBlock::new(0x1000, vec![0; 16]);
        let b = MemoryBlock::new(0x2000, vec![0; 16]);
        assert_eq!(a.overlap_with(&b), None);
    }

    #[test]
    fn overlap_with_computes_shared_range() {
        let a = MemoryBlock::new(0x1000, vec![0; 16]);
        let b = MemoryBlock::new(0x1008, vec![0; 16]);
        assert_eq!(a.overlap_with(&b), Some((0x1008, 0x1010)));
    }
}
