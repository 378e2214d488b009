use serde_json::to_string_pretty;
use squalr_engine_api::structures::settings::alignment_mode::AlignmentMode;
use squalr_engine_api::structures::settings::scan_settings::ScanSettings;
use squalr_engine_api::structures::settings::scan_thread_priority::ScanThreadPriority;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::{Arc, RwLock};

pub struct ScanSettingsConfig {
    config: Arc<RwLock<ScanSettings>>,
    config_file: PathBuf,
}

impl ScanSettingsConfig {
    fn new() -> Self {
        let config_file = Self::default_config_path();
        let config = if config_file.exists() {
            match fs::read_to_string(&config_file) {
                Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
                Err(_) => ScanSettings::default(),
            }
        } else {
            ScanSettings::default()
        };

        Self {
            config: Arc::new(RwLock::new(config)),
            config_file,
        }
    }

    fn get_instance() -> &'static ScanSettingsConfig {
        static mut INSTANCE: Option<ScanSettingsConfig> = None;
        static ONCE: Once = Once::new();

        unsafe {
            ONCE.call_once(|| {
                let instance = ScanSettingsConfig::new();
                INSTANCE = Some(instance);
            });

            #[allow(static_mut_refs)]
            INSTANCE.as_ref().unwrap_unchecked()
        }
    }

    fn default_config_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or(Path::new(""))
            .join("scan_settings.json")
    }

    fn save_config() {
        if let Ok(config) = Self::get_instance().config.read() {
            if let Ok(json) = to_string_pretty(&*config) {
                let _ = fs::write(&Self::get_instance().config_file, json);
            }
        }
    }

    pub fn get_full_config() -> &'static Arc<RwLock<ScanSettings>> {
        &Self::get_instance().config
    }

    pub fn get_scan_buffer_kb() -> u32 {
        Self::get_instance().config.read().map(|c| c.scan_buffer_kb).unwrap_or(2048)
    }

    pub fn set_scan_buffer_kb(value: u32) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.scan_buffer_kb = value.max(64);
        }

        Self::save_config();
    }

    pub fn get_thread_priority() -> ScanThreadPriority {
        Self::get_instance().config.read().map(|c| c.thread_priority).unwrap_or_default()
    }

    pub fn set_thread_priority(value: ScanThreadPriority) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.thread_priority = value;
        }

        Self::save_config();
    }

    pub fn get_alignment_mode() -> AlignmentMode {
        Self::get_instance().config.read().map(|c| c.alignment_mode).unwrap_or_default()
    }

    pub fn set_alignment_mode(value: AlignmentMode) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.alignment_mode = value;
        }

        Self::save_config();
    }

    pub fn get_results_visibility_cap() -> usize {
        Self::get_instance().config.read().map(|c| c.results_visibility_cap).unwrap_or(800)
    }

    pub fn set_results_visibility_cap(value: usize) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.results_visibility_cap = value.max(1);
        }

        Self::save_config();
    }

    pub fn get_refresh_interval_ms() -> u64 {
        Self::get_instance().config.read().map(|c| c.refresh_interval_ms).unwrap_or(800)
    }

    pub fn set_refresh_interval_ms(value: u64) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.refresh_interval_ms = value;
        }

        Self::save_config();
    }

    pub fn get_locked_write_interval_ms() -> u64 {
        Self::get_instance().config.read().map(|c| c.locked_write_interval_ms).unwrap_or(500)
    }

    pub fn set_locked_write_interval_ms(value: u64) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.locked_write_interval_ms = value;
        }

        Self::save_config();
    }

    pub fn get_repeat_scan_delay_ms() -> u64 {
        Self::get_instance().config.read().map(|c| c.repeat_scan_delay_ms).unwrap_or(0)
    }

    pub fn set_repeat_scan_delay_ms(value: u64) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.repeat_scan_delay_ms = value;
        }

        Self::save_config();
    }

    pub fn get_is_single_threaded_scan() -> bool {
        Self::get_instance().config.read().map(|c| c.is_single_threaded_scan).unwrap_or(false)
    }

    pub fn set_is_single_threaded_scan(value: bool) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.is_single_threaded_scan = value;
        }

        Self::save_config();
    }
}
