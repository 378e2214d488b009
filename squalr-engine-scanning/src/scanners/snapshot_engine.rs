use crate::codec::value_codec::ValueCodec;
use crate::scan_settings_config::ScanSettingsConfig;
use crate::scanners::scan_comparer::{LiveScanComparer, ScanComparer};
use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::address::Address;
use squalr_engine_api::structures::memory_block::MemoryBlock;
use squalr_engine_api::structures::scan_type::ScanType;
use squalr_engine_api::structures::scanning::op_type::OpType;
use squalr_engine_api::structures::settings::alignment_mode::AlignmentMode;
use squalr_engine_api::structures::snapshot::Snapshot;
use squalr_engine_api::structures::snapshot_scan::SnapshotScan;
use squalr_engine_memory::memory_io::LinuxMemoryReader;
use squalr_engine_memory::memory_queryer::MemoryQueryer;
use std::sync::{Arc, Mutex};

/// Snapshot Engine (C6): captures whole-process memory and compares
/// successive captures under a relational predicate, tolerant of region
/// drift between captures.
pub struct SnapshotEngine {
    comparer: Arc<dyn ScanComparer>,
    snapshot: Mutex<Option<Snapshot>>,
}

impl Default for SnapshotEngine {
    fn default() -> Self {
        Self::new(Arc::new(LiveScanComparer))
    }
}

impl SnapshotEngine {
    pub fn new(comparer: Arc<dyn ScanComparer>) -> Self {
        Self {
            comparer,
            snapshot: Mutex::new(None),
        }
    }

    /// Captures every readable region of `pid`. Supersedes any prior
    /// snapshot, which is simply dropped.
    pub fn take_snapshot(
        &self,
        pid: i32,
    ) -> Result<(), EngineError> {
        let blocks = Self::read_all_regions(pid)?;
        log::info!("Captured snapshot of pid {}: {} blocks", pid, blocks.len());

        let mut guard = self.snapshot.lock().expect("snapshot mutex poisoned");
        *guard = Some(Snapshot::new(pid as i64, blocks));
        Ok(())
    }

    /// First post-capture comparison: re-reads live memory and compares it
    /// against the stored snapshot block-by-block, tolerating mismatched
    /// block boundaries between the two reads.
    pub fn compare(
        &self,
        pid: i32,
        op: &OpType,
        scan_type: ScanType,
    ) -> Result<Vec<SnapshotScan>, EngineError> {
        let current_blocks = Self::read_all_regions(pid)?;

        let mut guard = self.snapshot.lock().expect("snapshot mutex poisoned");
        let snapshot = guard.as_mut().ok_or(EngineError::EmptySelection)?;

        let mut results = Vec::new();
        for current in &current_blocks {
            for previous in &snapshot.memory_blocks {
                if current.overlap_with(previous).is_some() {
                    results.extend(Self::compare_block_pair(current, previous, scan_type, op));
                }
            }
        }
        results.sort_by_key(|scan| scan.address);

        log::info!("Snapshot compare produced {} scans", results.len());
        snapshot.scan_unknown = false;
        snapshot.prior_scans = results.clone();

        Ok(results)
    }

    /// Refines the prior comparison: re-tests each retained scan through the
    /// pluggable comparer, dropping and rewriting as it goes.
    pub fn filter(
        &self,
        pid: i32,
        op: &OpType,
        scan_type: ScanType,
    ) -> Result<Vec<SnapshotScan>, EngineError> {
        let mut guard = self.snapshot.lock().expect("snapshot mutex poisoned");
        let snapshot = guard.as_mut().ok_or(EngineError::EmptySelection)?;

        let mut retained = Vec::new();
        for mut scan in snapshot.prior_scans.drain(..) {
            if self.comparer.compare_scan(&scan, pid as i64, op, scan_type) {
                self.comparer.update_scanned_value(&mut scan, pid as i64, scan_type);
                retained.push(scan);
            }
        }

        snapshot.prior_scans = retained.clone();
        Ok(retained)
    }

    fn read_all_regions(pid: i32) -> Result<Vec<MemoryBlock>, EngineError> {
        let regions = MemoryQueryer::list_readable_regions(pid)?;
        let reader = LinuxMemoryReader::open(pid)?;

        let mut blocks = Vec::with_capacity(regions.len());
        for (base_address, size) in regions {
            match reader.read(base_address, size) {
                Ok(data) => blocks.push(MemoryBlock::new(base_address, data)),
                Err(_) => log::debug!("Region at 0x{:x} became unreadable during snapshot capture; skipping.", base_address),
            }
        }

        Ok(blocks)
    }

    /// Pairwise block comparison (§4.6.2): iterate the overlapping address
    /// range at the configured alignment stride, comparing `width(scan_type)`
    /// windows of `current` against `previous`.
    fn compare_block_pair(
        current: &MemoryBlock,
        previous: &MemoryBlock,
        scan_type: ScanType,
        op: &OpType,
    ) -> Vec<SnapshotScan> {
        let Some(width) = scan_type.width() else {
            return Vec::new();
        };

        let Some((overlap_start, overlap_end)) = current.overlap_with(previous) else {
            return Vec::new();
        };

        if overlap_end - overlap_start < width as Address {
            return Vec::new();
        }

        let stride: Address = match ScanSettingsConfig::get_alignment_mode() {
            AlignmentMode::Unaligned => 1,
            AlignmentMode::Aligned => width as Address,
        };

        let mut matches = Vec::new();
        let mut k: Address = 0;

        while overlap_start + k + width as Address <= overlap_end {
            let cur_offset = ((overlap_start - current.base_address) + k) as usize;
            let prev_offset = ((overlap_start - previous.base_address) + k) as usize;
            let cur_window = &current.data[cur_offset..cur_offset + width];
            let prev_window = &previous.data[prev_offset..prev_offset + width];

            if let Ok(true) = ValueCodec::compare(scan_type, cur_window, prev_window, op) {
                matches.push(SnapshotScan::new(overlap_start + k, cur_window.to_vec()));
            }

            k += stride;
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with_leading_words(
        base_address: Address,
        len: usize,
        leading: &[(usize, i32)],
    ) -> MemoryBlock {
        let mut data = vec![0u8; len];
        for (offset, value) in leading {
            data[*offset..*offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        MemoryBlock::new(base_address, data)
    }

    #[test]
    fn block_pair_equal_ranges_lt() {
        let current = block_with_leading_words(0x08002000, 12, &[(0, 10), (4, 20)]);
        let previous = block_with_leading_words(0x08002000, 12, &[(0, 30), (4, 40)]);

        let matches = SnapshotEngine::compare_block_pair(&current, &previous, ScanType::Int32, &OpType::Lt);
        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0].address, 0x08002000);
        assert_eq!(matches[0].scanned_value[0], 10);
        assert_eq!(matches[4].address, 0x08002004);
        assert_eq!(matches[4].scanned_value[0], 20);
    }

    #[test]
    fn block_pair_current_longer_previous_shifted() {
        let current = block_with_leading_words(0x08002000, 12, &[(0, 10), (4, 20)]);
        let previous = block_with_leading_words(0x08002004, 8, &[(0, 30), (4, 40)]);

        let matches = SnapshotEngine::compare_block_pair(&current, &previous, ScanType::Int32, &OpType::Lt);
        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0].address, 0x08002004);
        assert_eq!(matches[0].scanned_value[0], 20);
        assert_eq!(matches[4].address, 0x08002008);
        assert_eq!(matches[4].scanned_value[0], 0);
    }

    #[test]
    fn block_pair_current_shifted_one_byte_right() {
        let current = block_with_leading_words(0x08002001, 6, &[(0, 10)]);
        let previous = block_with_leading_words(0x08002000, 6, &[(1, 30)]);

        let matches = SnapshotEngine::compare_block_pair(&current, &previous, ScanType::Int32, &OpType::Lt);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address, 0x08002001);
        assert_eq!(matches[0].scanned_value[0], 10);
    }

    #[test]
    fn block_pair_previous_shifted_one_byte_right() {
        let current = block_with_leading_words(0x08002000, 6, &[(1, 10)]);
        let previous = block_with_leading_words(0x08002001, 6, &[(0, 30)]);

        let matches = SnapshotEngine::compare_block_pair(&current, &previous, ScanType::Int32, &OpType::Lt);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address, 0x08002001);
        assert_eq!(matches[0].scanned_value[0], 10);
    }

    #[test]
    fn block_pair_equal_ranges_gt_mirrors_lt_case() {
        let current = block_with_leading_words(0x08002000, 12, &[(0, 40)]);
        let previous = block_with_leading_words(0x08002000, 12, &[(0, 30)]);

        let matches = SnapshotEngine::compare_block_pair(&current, &previous, ScanType::Int32, &OpType::Gt);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address, 0x08002000);
        assert_eq!(matches[0].scanned_value[0], 40);
    }

    #[test]
    fn disjoint_blocks_each_contribute_one_match() {
        let current_a = block_with_leading_words(0x08002000, 12, &[(0, 40)]);
        let previous_a = block_with_leading_words(0x08002000, 12, &[(0, 20)]);
        let current_b = block_with_leading_words(0x08003000, 20, &[(0, 50)]);
        let previous_b = block_with_leading_words(0x08003000, 20, &[(0, 30)]);

        let mut results = SnapshotEngine::compare_block_pair(&current_a, &previous_a, ScanType::Int32, &OpType::Gt);
        results.extend(SnapshotEngine::compare_block_pair(&current_b, &previous_b, ScanType::Int32, &OpType::Gt));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].address, 0x08002000);
        assert_eq!(results[0].scanned_value[0], 40);
        assert_eq!(results[1].address, 0x08003000);
        assert_eq!(results[1].scanned_value[0], 50);
    }

    #[test]
    fn filter_with_always_true_comparer_rewrites_byte_zero() {
        use crate::scanners::scan_comparer::test_support::StubScanComparer;

        let engine = SnapshotEngine::new(Arc::new(StubScanComparer {
            always_matches: true,
            rewrite_byte: 60,
        }));

        {
            let mut guard = engine.snapshot.lock().unwrap();
            *guard = Some(Snapshot {
                pid: 1,
                memory_blocks: Vec::new(),
                scan_unknown: false,
                prior_scans: vec![SnapshotScan::new(0x08002000, vec![40, 0, 0, 0]), SnapshotScan::new(0x08003000, vec![50, 0, 0, 0])],
            });
        }

        let result = engine.filter(1, &OpType::Any, ScanType::Int32).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].scanned_value[0], 60);
        assert_eq!(result[1].scanned_value[0], 60);
    }

    #[test]
    fn filter_with_always_false_comparer_empties_result() {
        use crate::scanners::scan_comparer::test_support::StubScanComparer;

        let engine = SnapshotEngine::new(Arc::new(StubScanComparer {
            always_matches: false,
            rewrite_byte: 60,
        }));

        {
            let mut guard = engine.snapshot.lock().unwrap();
            *guard = Some(Snapshot {
                pid: 1,
                memory_blocks: Vec::new(),
                scan_unknown: false,
                prior_scans: vec![SnapshotScan::new(0x08002000, vec![40, 0, 0, 0])],
            });
        }

        let result = engine.filter(1, &OpType::Any, ScanType::Int32).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn compare_without_a_prior_snapshot_is_rejected() {
        let engine = SnapshotEngine::default();
        let result = engine.filter(1, &OpType::Any, ScanType::Int32);
        assert!(matches!(result, Err(EngineError::EmptySelection)));
    }
}
