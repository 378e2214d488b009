bitflags::bitflags! {
    /// Mirrors the `rwxp`/`rwxs` permission field of a `/proc/<pid>/maps` line.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct MemoryProtectionEnum: u32 {
        const NONE = 0x0;
        const READ = 0x1;
        const WRITE = 0x2;
        const EXECUTE = 0x4;
        /// The `p` (private, copy-on-write) flag, as opposed to `s` (shared).
        const PRIVATE = 0x8;
    }
}

impl MemoryProtectionEnum {
    /// Parses the 4-character permission field of a maps line, e.g. `"rw-p"`.
    pub fn from_maps_field(field: &str) -> Self {
        let mut flags = MemoryProtectionEnum::empty();
        let bytes = field.as_bytes();

        if bytes.first() == Some(&b'r') {
            flags |= MemoryProtectionEnum::READ;
        }
        if bytes.get(1) == Some(&b'w') {
            flags |= MemoryProtectionEnum::WRITE;
        }
        if bytes.get(2) == Some(&b'x') {
            flags |= MemoryProtectionEnum::EXECUTE;
        }
        if bytes.get(3) == Some(&b'p') {
            flags |= MemoryProtectionEnum::PRIVATE;
        }

        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_readable_writable_private() {
        let flags = MemoryProtectionEnum::from_maps_field("rw-p");
        assert!(flags.contains(MemoryProtectionEnum::READ));
        assert!(flags.contains(MemoryProtectionEnum::WRITE));
        assert!(!flags.contains(MemoryProtectionEnum::EXECUTE));
        assert!(flags.contains(MemoryProtectionEnum::PRIVATE));
    }

    #[test]
    fn parses_readonly_shared() {
        let flags = MemoryProtectionEnum::from_maps_field("r--s");
        assert_eq!(flags, MemoryProtectionEnum::READ);
    }
}
