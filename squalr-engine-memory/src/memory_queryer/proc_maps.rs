use crate::memory_queryer::memory_protection_enum::MemoryProtectionEnum;
use crate::memory_queryer::memory_type_enum::MemoryTypeEnum;
use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::address::Address;
use std::fs;

/// A single parsed line of `/proc/<pid>/maps`:
/// `start-end perms offset dev inode pathname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsRegion {
    pub base_address: Address,
    pub size: u64,
    pub protection: MemoryProtectionEnum,
    pub memory_type: MemoryTypeEnum,
    pub pathname: String,
}

impl MapsRegion {
    pub fn end_address(&self) -> Address {
        self.base_address + self.size
    }
}

/// Reads and parses `/proc/<pid>/maps`. Lines that don't match the expected
/// shape are skipped rather than aborting the whole enumeration.
pub fn read_maps(pid: i32) -> Result<Vec<MapsRegion>, EngineError> {
    let maps_path = format!("/proc/{}/maps", pid);
    let content = fs::read_to_string(&maps_path).map_err(|error| match error.kind() {
        std::io::ErrorKind::NotFound => EngineError::NoSuchProcess,
        std::io::ErrorKind::PermissionDenied => EngineError::PermissionDenied,
        _ => EngineError::NoSuchProcess,
    })?;

    Ok(parse_maps(&content))
}

pub fn parse_maps(content: &str) -> Vec<MapsRegion> {
    let mut regions = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.splitn(6, ' ').filter(|part| !part.is_empty()).collect();
        if parts.len() < 2 {
            continue;
        }

        let mut addr_range = parts[0].split('-');
        let (Some(start_hex), Some(end_hex)) = (addr_range.next(), addr_range.next()) else {
            continue;
        };
        let (Ok(start), Ok(end)) = (Address::from_str_radix(start_hex, 16), Address::from_str_radix(end_hex, 16)) else {
            continue;
        };
        if end <= start {
            continue;
        }

        let protection = MemoryProtectionEnum::from_maps_field(parts[1]);
        let pathname = parts.get(5).map(|raw| raw.trim()).unwrap_or("").to_string();

        let memory_type = if pathname.is_empty() || pathname.starts_with('[') {
            MemoryTypeEnum::PRIVATE
        } else if protection.contains(MemoryProtectionEnum::PRIVATE) {
            MemoryTypeEnum::IMAGE
        } else {
            MemoryTypeEnum::MAPPED
        };

        regions.push(MapsRegion {
            base_address: start,
            size: end - start,
            protection,
            memory_type,
            pathname,
        });
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
00400000-00452000 r-xp 00000000 08:02 173521 /usr/bin/cat
7f1234560000-7f1234580000 rw-p 00000000 00:00 0 [heap]
7f1234580000-7f1234590000 rw-p 00000000 00:00 0
7ffd12340000-7ffd12361000 rw-p 00000000 00:00 0 [stack]
";

    #[test]
    fn parses_all_lines() {
        let regions = parse_maps(SAMPLE);
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn computes_base_and_size() {
        let regions = parse_maps(SAMPLE);
        assert_eq!(regions[0].base_address, 0x00400000);
        assert_eq!(regions[0].size, 0x52000);
        assert_eq!(regions[0].end_address(), 0x00452000);
    }

    #[test]
    fn classifies_anonymous_regions_as_private() {
        let regions = parse_maps(SAMPLE);
        assert_eq!(regions[1].memory_type, MemoryTypeEnum::PRIVATE);
        assert_eq!(regions[2].memory_type, MemoryTypeEnum::PRIVATE);
    }

    #[test]
    fn classifies_file_backed_region_as_image() {
        let regions = parse_maps(SAMPLE);
        assert_eq!(regions[0].memory_type, MemoryTypeEnum::IMAGE);
        assert!(regions[0].protection.contains(MemoryProtectionEnum::READ | MemoryProtectionEnum::EXECUTE));
    }
}
