use crate::codec::value_codec::ValueCodec;
use squalr_engine_api::structures::scan_type::ScanType;
use squalr_engine_api::structures::scanning::op_type::OpType;
use squalr_engine_api::structures::snapshot_scan::SnapshotScan;
use squalr_engine_memory::memory_io::LinuxMemoryReader;

/// The comparison capability the Snapshot Engine (C6) is built against.
/// Factored out so the engine can be unit tested without a live target —
/// mirrors the teacher's dependency-injection style, but as a plain trait
/// object rather than a full DI container.
pub trait ScanComparer: Send + Sync {
    fn compare_scan(
        &self,
        scan: &SnapshotScan,
        pid: i64,
        op: &OpType,
        scan_type: ScanType,
    ) -> bool;

    fn update_scanned_value(
        &self,
        scan: &mut SnapshotScan,
        pid: i64,
        scan_type: ScanType,
    );
}

/// Reads the candidate's current bytes through C2 and uses them for both the
/// predicate test and the refreshed `scanned_value`.
#[derive(Default)]
pub struct LiveScanComparer;

impl ScanComparer for LiveScanComparer {
    fn compare_scan(
        &self,
        scan: &SnapshotScan,
        pid: i64,
        op: &OpType,
        scan_type: ScanType,
    ) -> bool {
        let Some(width) = scan_type.width() else {
            return false;
        };

        let Ok(reader) = LinuxMemoryReader::open(pid as i32) else {
            return false;
        };

        match reader.read(scan.address, width) {
            Ok(current) => ValueCodec::compare(scan_type, &current, &scan.scanned_value, op).unwrap_or(false),
            Err(_) => false,
        }
    }

    fn update_scanned_value(
        &self,
        scan: &mut SnapshotScan,
        pid: i64,
        scan_type: ScanType,
    ) {
        let Some(width) = scan_type.width() else {
            return;
        };

        if let Ok(reader) = LinuxMemoryReader::open(pid as i32) {
            if let Ok(current) = reader.read(scan.address, width) {
                scan.scanned_value = current;
            }
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// A canned comparer for tests: `compare_scan` always answers
    /// `always_matches`, `update_scanned_value` overwrites byte 0 with
    /// `rewrite_byte`.
    pub struct StubScanComparer {
        pub always_matches: bool,
        pub rewrite_byte: u8,
    }

    impl ScanComparer for StubScanComparer {
        fn compare_scan(
            &self,
            _scan: &SnapshotScan,
            _pid: i64,
            _op: &OpType,
            _scan_type: ScanType,
        ) -> bool {
            self.always_matches
        }

        fn update_scanned_value(
            &self,
            scan: &mut SnapshotScan,
            _pid: i64,
            _scan_type: ScanType,
        ) {
            if let Some(first) = scan.scanned_value.first_mut() {
                *first = self.rewrite_byte;
            }
        }
    }
}
