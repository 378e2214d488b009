use crate::structures::memory_block::MemoryBlocks;
use crate::structures::snapshot_scan::SnapshotScan;

/// A full-process memory capture held by the snapshot engine between
/// `take_snapshot` and the next `compare`/`filter` cycle.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub pid: i64,
    pub memory_blocks: MemoryBlocks,
    pub scan_unknown: bool,
    pub prior_scans: Vec<SnapshotScan>,
}

impl Snapshot {
    pub fn new(
        pid: i64,
        memory_blocks: MemoryBlocks,
    ) -> Self {
        Self {
            pid,
            memory_blocks,
            scan_unknown: true,
            prior_scans: Vec::new(),
        }
    }
}
