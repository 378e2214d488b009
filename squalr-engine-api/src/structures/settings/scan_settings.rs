use crate::structures::settings::alignment_mode::AlignmentMode;
use crate::structures::settings::scan_thread_priority::ScanThreadPriority;
use serde::{Deserialize, Serialize};
use serde_json::to_string_pretty;
use std::fmt;

#[derive(Copy, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSettings {
    pub scan_buffer_kb: u32,
    pub thread_priority: ScanThreadPriority,
    pub alignment_mode: AlignmentMode,
    pub results_visibility_cap: usize,
    pub refresh_interval_ms: u64,
    pub locked_write_interval_ms: u64,
    pub repeat_scan_delay_ms: u64,
    pub is_single_threaded_scan: bool,
}

impl fmt::Debug for ScanSettings {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match to_string_pretty(&self) {
            Ok(json) => write!(formatter, "Settings for scan: {}", json),
            Err(_) => write!(formatter, "Scan config {{ could not serialize to JSON }}"),
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            scan_buffer_kb: 2048,
            thread_priority: ScanThreadPriority::Normal,
            alignment_mode: AlignmentMode::Unaligned,
            results_visibility_cap: 800,
            // Matches the UI's tolerance for stale values without saturating a refresh thread.
            refresh_interval_ms: 800,
            locked_write_interval_ms: 500,
            repeat_scan_delay_ms: 0,
            is_single_threaded_scan: false,
        }
    }
}
