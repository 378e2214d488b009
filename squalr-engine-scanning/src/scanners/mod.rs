pub mod address_scanner;
pub mod scan_comparer;
pub mod snapshot_engine;

pub use address_scanner::AddressScanner;
pub use scan_comparer::{LiveScanComparer, ScanComparer};
pub use snapshot_engine::SnapshotEngine;
