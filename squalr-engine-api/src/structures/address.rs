/// A target-process virtual address, wide enough for a 64-bit address space
/// regardless of the host's own pointer width.
pub type Address = u64;
