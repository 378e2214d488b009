use crate::config::memory_settings_config::MemorySettingsConfig;
use crate::memory_queryer::memory_protection_enum::MemoryProtectionEnum;
use crate::memory_queryer::memory_type_enum::MemoryTypeEnum;
use crate::memory_queryer::proc_maps::{MapsRegion, read_maps};
use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::address::Address;

/// Region Enumerator (C1): lists the target process's readable memory
/// regions, driven by the `MemorySettingsConfig` filters.
pub struct MemoryQueryer;

impl MemoryQueryer {
    /// Snapshot buffers are duplicated (current + previous); cap how much we
    /// will ever try to hold at once.
    const MAX_SCAN_SNAPSHOT_BYTES: u64 = 2 * 1024 * 1024 * 1024;

    /// The exact sweep universe for both scanners: every region readable at
    /// all, regardless of the memory settings filters.
    pub fn list_readable_regions(pid: i32) -> Result<Vec<(Address, usize)>, EngineError> {
        let regions = read_maps(pid)?;

        Ok(regions
            .into_iter()
            .filter(|region| region.protection.contains(MemoryProtectionEnum::READ))
            .map(|region| (region.base_address, region.size as usize))
            .collect())
    }

    /// The filtered sweep universe the scanners actually use, honoring the
    /// memory settings (writable-only, usermode-only, type filters), with a
    /// relaxation cascade so a misconfigured filter set doesn't silently
    /// yield zero regions.
    pub fn query_pages_from_settings(pid: i32) -> Result<Vec<MapsRegion>, EngineError> {
        let all_regions = read_maps(pid)?;
        let required_flags = Self::get_required_protection_settings();
        let allowed_types = Self::get_allowed_type_settings();

        let filtered = Self::filter(&all_regions, required_flags, allowed_types);
        let total_size: u64 = filtered.iter().map(|region| region.size).sum();

        if total_size == 0 {
            log::warn!("No pages matched the current memory settings. Retrying without required protection flags.");
            let relaxed = Self::filter(&all_regions, MemoryProtectionEnum::empty(), allowed_types);
            let relaxed_size: u64 = relaxed.iter().map(|region| region.size).sum();

            if relaxed_size > 0 {
                log::warn!("Recovered {} bytes by relaxing required protection flags.", relaxed_size);
                return Ok(relaxed);
            }

            log::warn!("Relaxed protection flags still yielded no pages. Falling back to writable pages only.");
            let fallback = Self::filter(&all_regions, MemoryProtectionEnum::WRITE, MemoryTypeEnum::all());
            if fallback.is_empty() {
                log::error!("Writable fallback returned no pages. Falling back to all readable pages.");
                return Ok(all_regions
                    .into_iter()
                    .filter(|region| region.protection.contains(MemoryProtectionEnum::READ))
                    .collect());
            }
            return Ok(fallback);
        }

        if total_size > Self::MAX_SCAN_SNAPSHOT_BYTES {
            log::warn!("Scan snapshot too large: {} bytes. Truncating to the configured cap.", total_size);
            return Ok(Self::truncate_to_max(filtered, Self::MAX_SCAN_SNAPSHOT_BYTES));
        }

        Ok(filtered)
    }

    fn filter(
        regions: &[MapsRegion],
        required_flags: MemoryProtectionEnum,
        allowed_types: MemoryTypeEnum,
    ) -> Vec<MapsRegion> {
        let only_usermode = MemorySettingsConfig::get_only_query_usermode();
        let start_address = MemorySettingsConfig::get_start_address();
        let end_address = MemorySettingsConfig::get_end_address();

        regions
            .iter()
            .filter(|region| region.protection.contains(MemoryProtectionEnum::READ))
            .filter(|region| region.protection.contains(required_flags))
            .filter(|region| allowed_types.contains(region.memory_type))
            .filter(|region| !only_usermode || region.base_address >= start_address)
            .filter(|region| region.end_address() <= end_address || end_address == u64::MAX)
            .cloned()
            .collect()
    }

    fn truncate_to_max(
        regions: Vec<MapsRegion>,
        max_bytes: u64,
    ) -> Vec<MapsRegion> {
        let mut total = 0u64;
        let mut trimmed = Vec::new();

        for mut region in regions {
            if total >= max_bytes {
                break;
            }

            let remaining = max_bytes - total;
            if region.size > remaining {
                region.size = remaining;
            }

            total += region.size;
            trimmed.push(region);
        }

        trimmed
    }

    fn get_allowed_type_settings() -> MemoryTypeEnum {
        let mut result = MemoryTypeEnum::empty();

        if MemorySettingsConfig::get_memory_type_private() {
            result |= MemoryTypeEnum::PRIVATE;
        }
        if MemorySettingsConfig::get_memory_type_image() {
            result |= MemoryTypeEnum::IMAGE;
        }
        if MemorySettingsConfig::get_memory_type_mapped() {
            result |= MemoryTypeEnum::MAPPED;
        }

        result
    }

    fn get_required_protection_settings() -> MemoryProtectionEnum {
        let mut result = MemoryProtectionEnum::empty();

        if MemorySettingsConfig::get_required_write() {
            result |= MemoryProtectionEnum::WRITE;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_to_max_caps_total_bytes() {
        let regions = vec![
            MapsRegion {
                base_address: 0x1000,
                size: 100,
                protection: MemoryProtectionEnum::READ,
                memory_type: MemoryTypeEnum::PRIVATE,
                pathname: String::new(),
            },
            MapsRegion {
                base_address: 0x2000,
                size: 100,
                protection: MemoryProtectionEnum::READ,
                memory_type: MemoryTypeEnum::PRIVATE,
                pathname: String::new(),
            },
        ];

        let trimmed = MemoryQueryer::truncate_to_max(regions, 150);
        let total: u64 = trimmed.iter().map(|region| region.size).sum();
        assert_eq!(total, 150);
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed[1].size, 50);
    }
}
