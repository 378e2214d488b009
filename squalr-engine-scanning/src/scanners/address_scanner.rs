use crate::codec::value_codec::ValueCodec;
use crate::parser::{BytePattern, ScanExpressionParser};
use crate::scan_settings_config::ScanSettingsConfig;
use rayon::prelude::*;
use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::candidate::Candidate;
use squalr_engine_api::structures::scan_type::ScanType;
use squalr_engine_api::structures::scanning::op_type::OpType;
use squalr_engine_api::structures::settings::alignment_mode::AlignmentMode;
use squalr_engine_memory::memory_io::LinuxMemoryReader;
use squalr_engine_memory::memory_queryer::MemoryQueryer;

/// Address Scanner (C5): a value-directed sweep and filter over a shrinking
/// candidate list.
pub struct AddressScanner;

impl AddressScanner {
    /// Initial scan: sweeps every region the memory settings admit and
    /// emits a candidate for every offset whose decoded value satisfies
    /// `op` against `reference`.
    pub fn scan(
        pid: i32,
        scan_type: ScanType,
        op: &OpType,
        reference: &[u8],
    ) -> Result<Vec<Candidate>, EngineError> {
        let width = Self::effective_width(scan_type, reference)?;
        let stride = Self::stride(scan_type, width);
        let regions = MemoryQueryer::query_pages_from_settings(pid)?;
        let reader = LinuxMemoryReader::open(pid)?;

        log::info!("Starting value-directed scan over {} regions (width={}, stride={})", regions.len(), width, stride);

        let candidates: Vec<Candidate> = regions
            .par_iter()
            .flat_map(|region| {
                let bytes = match reader.read(region.base_address, region.size as usize) {
                    Ok(bytes) => bytes,
                    Err(_) => {
                        log::debug!("Region at 0x{:x} became unreadable during scan; skipping.", region.base_address);
                        return Vec::new();
                    }
                };

                Self::scan_buffer(region.base_address, &bytes, width, stride, scan_type, op, reference)
            })
            .collect();

        log::info!("Scan complete: {} candidates found", candidates.len());
        Ok(candidates)
    }

    /// Filter: re-reads each candidate's current value and keeps it only if
    /// it still satisfies `op` against `reference`. A per-candidate read
    /// failure drops that candidate without aborting the pass.
    pub fn filter(
        pid: i32,
        candidates: Vec<Candidate>,
        op: &OpType,
        reference: &[u8],
    ) -> Result<Vec<Candidate>, EngineError> {
        let reader = LinuxMemoryReader::open(pid)?;

        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter_map(|mut candidate| {
                let width = candidate.scan_type.width().unwrap_or(candidate.last_value.len());
                match reader.read(candidate.address, width) {
                    Ok(bytes) => match ValueCodec::compare(candidate.scan_type, &bytes, reference, op) {
                        Ok(true) => {
                            candidate.last_value = bytes;
                            Some(candidate)
                        }
                        Ok(false) => None,
                        Err(error) => {
                            log::debug!("Filter comparison error at 0x{:x}: {}", candidate.address, error);
                            None
                        }
                    },
                    Err(_) => {
                        log::debug!("Candidate at 0x{:x} became unreadable; dropping.", candidate.address);
                        None
                    }
                }
            })
            .collect();

        Ok(filtered)
    }

    /// Composite byte-pattern scan (§4.4): sweeps every region byte-by-byte
    /// looking for `pattern`'s wildcard-aware match, the AOB-scan counterpart
    /// to `scan`'s single-value sweep.
    pub fn scan_pattern(
        pid: i32,
        pattern: &BytePattern,
    ) -> Result<Vec<Candidate>, EngineError> {
        let regions = MemoryQueryer::query_pages_from_settings(pid)?;
        let reader = LinuxMemoryReader::open(pid)?;

        log::info!("Starting composite pattern scan over {} regions (pattern width={})", regions.len(), pattern.len());

        let candidates: Vec<Candidate> = regions
            .par_iter()
            .flat_map(|region| {
                let bytes = match reader.read(region.base_address, region.size as usize) {
                    Ok(bytes) => bytes,
                    Err(_) => {
                        log::debug!("Region at 0x{:x} became unreadable during scan; skipping.", region.base_address);
                        return Vec::new();
                    }
                };

                Self::scan_buffer_pattern(region.base_address, &bytes, pattern)
            })
            .collect();

        log::info!("Pattern scan complete: {} candidates found", candidates.len());
        Ok(candidates)
    }

    /// Re-applies `pattern` to each candidate's current bytes, dropping
    /// non-matches and unreadable candidates.
    pub fn filter_pattern(
        pid: i32,
        candidates: Vec<Candidate>,
        pattern: &BytePattern,
    ) -> Result<Vec<Candidate>, EngineError> {
        let reader = LinuxMemoryReader::open(pid)?;
        let width = pattern.len();

        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter_map(|mut candidate| match reader.read(candidate.address, width) {
                Ok(bytes) => {
                    if ScanExpressionParser::matches_pattern(&bytes, pattern) {
                        candidate.last_value = bytes;
                        Some(candidate)
                    } else {
                        None
                    }
                }
                Err(_) => {
                    log::debug!("Candidate at 0x{:x} became unreadable; dropping.", candidate.address);
                    None
                }
            })
            .collect();

        Ok(filtered)
    }

    fn scan_buffer_pattern(
        base_address: u64,
        bytes: &[u8],
        pattern: &BytePattern,
    ) -> Vec<Candidate> {
        let width = pattern.len();
        if width == 0 || bytes.len() < width {
            return Vec::new();
        }

        (0..=bytes.len() - width)
            .filter_map(|offset| {
                let window = &bytes[offset..offset + width];
                ScanExpressionParser::matches_pattern(window, pattern).then(|| Candidate::new(base_address + offset as u64, ScanType::ByteArray, window.to_vec()))
            })
            .collect()
    }

    fn scan_buffer(
        base_address: u64,
        bytes: &[u8],
        width: usize,
        stride: usize,
        scan_type: ScanType,
        op: &OpType,
        reference: &[u8],
    ) -> Vec<Candidate> {
        if width == 0 || bytes.len() < width {
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut offset = 0usize;

        while offset + width <= bytes.len() {
            let window = &bytes[offset..offset + width];

            match ValueCodec::compare(scan_type, window, reference, op) {
                Ok(true) => matches.push(Candidate::new(base_address + offset as u64, scan_type, window.to_vec())),
                Ok(false) => {}
                Err(_) => break,
            }

            offset += stride;
        }

        matches
    }

    fn effective_width(
        scan_type: ScanType,
        reference: &[u8],
    ) -> Result<usize, EngineError> {
        match scan_type.width() {
            Some(width) => Ok(width),
            None if !reference.is_empty() => Ok(reference.len()),
            None => Err(EngineError::ParseError(
                "string/byte-array scans require a reference value to determine width".to_string(),
            )),
        }
    }

    fn stride(
        scan_type: ScanType,
        width: usize,
    ) -> usize {
        if !scan_type.is_numeric() {
            return 1;
        }

        match ScanSettingsConfig::get_alignment_mode() {
            AlignmentMode::Unaligned => 1,
            AlignmentMode::Aligned => width.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_buffer_finds_unaligned_match() {
        let bytes: Vec<u8> = vec![0x00, 0x2A, 0x00, 0x00, 0x00, 0x00];
        let reference = 42i32.to_le_bytes().to_vec();
        let matches = AddressScanner::scan_buffer(0x1000, &bytes, 4, 1, ScanType::Int32, &OpType::Eq, &reference);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address, 0x1001);
    }

    #[test]
    fn scan_buffer_aligned_stride_skips_unaligned_hit() {
        let bytes: Vec<u8> = vec![0x00, 0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let reference = 42i32.to_le_bytes().to_vec();
        let matches = AddressScanner::scan_buffer(0x1000, &bytes, 4, 4, ScanType::Int32, &OpType::Eq, &reference);
        assert!(matches.is_empty());
    }

    #[test]
    fn scan_buffer_does_not_overread_trailing_bytes() {
        let bytes: Vec<u8> = vec![0x01, 0x02, 0x03];
        let reference = 1i32.to_le_bytes().to_vec();
        let matches = AddressScanner::scan_buffer(0x1000, &bytes, 4, 1, ScanType::Int32, &OpType::Eq, &reference);
        assert!(matches.is_empty());
    }

    #[test]
    fn scan_buffer_pattern_finds_wildcard_match_at_every_offset() {
        let bytes: Vec<u8> = vec![0x00, 0xDE, 0x99, 0xBE, 0xEF, 0x00];
        let pattern = ScanExpressionParser::parse_pattern("DE ? BE EF").unwrap();
        let matches = AddressScanner::scan_buffer_pattern(0x2000, &bytes, &pattern);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address, 0x2001);
        assert_eq!(matches[0].last_value, vec![0xDE, 0x99, 0xBE, 0xEF]);
    }
}
