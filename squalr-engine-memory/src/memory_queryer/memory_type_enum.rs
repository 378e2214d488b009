bitflags::bitflags! {
    /// Categorizes a mapping by its backing: anonymous (private heap/stack/brk),
    /// file-backed (an `.so`/executable image), or shared-file-backed.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct MemoryTypeEnum: u32 {
        const NONE = 0x0;
        const PRIVATE = 0x1;
        const IMAGE = 0x2;
        const MAPPED = 0x4;
    }
}
