use serde::{Deserialize, Serialize};

/// Governs the probe stride C5 walks a region at. `Unaligned` probes every
/// byte offset (catches values the target itself wrote unaligned);
/// `Aligned` skips by the scan type's width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum AlignmentMode {
    #[default]
    Unaligned,
    Aligned,
}
