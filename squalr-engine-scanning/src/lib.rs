pub mod codec;
pub mod parser;
pub mod scan_settings_config;
pub mod scanners;
pub mod workers;

pub use codec::ValueCodec;
pub use parser::{BytePattern, ScanExpressionParser};
pub use scan_settings_config::ScanSettingsConfig;
pub use scanners::{AddressScanner, LiveScanComparer, ScanComparer, SnapshotEngine};
pub use workers::LockedWriteWorker;
