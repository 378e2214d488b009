use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::address::Address;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;

/// Memory I/O (C2), write half. Opens `/proc/<pid>/mem` for writing; the
/// kernel itself enforces that the region is actually writable (`PROT_WRITE`)
/// so there is no Windows-style `VirtualProtectEx` dance to do first.
pub struct LinuxMemoryWriter {
    mem_file: File,
}

impl LinuxMemoryWriter {
    pub fn open(pid: i32) -> Result<Self, EngineError> {
        let path = format!("/proc/{}/mem", pid);
        let mem_file = OpenOptions::new().write(true).open(&path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => EngineError::NoSuchProcess,
            ErrorKind::PermissionDenied => EngineError::PermissionDenied,
            _ => EngineError::NoSuchProcess,
        })?;

        Ok(Self { mem_file })
    }

    pub fn write(
        &self,
        address: Address,
        data: &[u8],
    ) -> Result<(), EngineError> {
        self.mem_file
            .write_all_at(data, address)
            .map_err(|_| EngineError::WriteFailed(address, data.len()))
    }
}
