use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::address::Address;
use squalr_engine_api::structures::memory_block::Bytes;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;

/// Memory I/O (C2), read half. Holds `/proc/<pid>/mem` open for the
/// lifetime of the scan session so repeated reads don't pay open() cost,
/// and uses positioned reads so no `ptrace`-stop of the target is required.
pub struct LinuxMemoryReader {
    mem_file: File,
}

impl LinuxMemoryReader {
    pub fn open(pid: i32) -> Result<Self, EngineError> {
        let path = format!("/proc/{}/mem", pid);
        let mem_file = OpenOptions::new().read(true).open(&path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => EngineError::NoSuchProcess,
            ErrorKind::PermissionDenied => EngineError::PermissionDenied,
            _ => EngineError::NoSuchProcess,
        })?;

        Ok(Self { mem_file })
    }

    /// Reads exactly `len` bytes starting at `address`. Partial reads are
    /// reported as a failure rather than returned truncated.
    pub fn read(
        &self,
        address: Address,
        len: usize,
    ) -> Result<Bytes, EngineError> {
        let mut buffer = vec![0u8; len];
        self.mem_file
            .read_exact_at(&mut buffer, address)
            .map_err(|_| EngineError::ReadFailed(address, len))?;
        Ok(buffer)
    }
}
