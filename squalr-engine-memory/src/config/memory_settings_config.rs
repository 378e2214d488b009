use serde_json::to_string_pretty;
use squalr_engine_api::structures::settings::memory_settings::MemorySettings;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::{Arc, RwLock};

pub struct MemorySettingsConfig {
    config: Arc<RwLock<MemorySettings>>,
    config_file: PathBuf,
}

impl MemorySettingsConfig {
    fn new() -> Self {
        let config_file = Self::default_config_path();
        let config = if config_file.exists() {
            match fs::read_to_string(&config_file) {
                Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
                Err(_) => MemorySettings::default(),
            }
        } else {
            MemorySettings::default()
        };

        Self {
            config: Arc::new(RwLock::new(config)),
            config_file,
        }
    }

    fn get_instance() -> &'static MemorySettingsConfig {
        static mut INSTANCE: Option<MemorySettingsConfig> = None;
        static ONCE: Once = Once::new();

        unsafe {
            ONCE.call_once(|| {
                let instance = MemorySettingsConfig::new();
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
            .join("memory_settings.json")
    }

    fn save_config() {
        if let Ok(config) = Self::get_instance().config.read() {
            if let Ok(json) = to_string_pretty(&*config) {
                let _ = fs::write(&Self::get_instance().config_file, json);
            }
        }
    }

    pub fn get_full_config() -> &'static Arc<RwLock<MemorySettings>> {
        &Self::get_instance().config
    }

    pub fn get_memory_type_private() -> bool {
        Self::get_instance().config.read().map(|c| c.memory_type_private).unwrap_or(true)
    }

    pub fn get_memory_type_image() -> bool {
        Self::get_instance().config.read().map(|c| c.memory_type_image).unwrap_or(true)
    }

    pub fn get_memory_type_mapped() -> bool {
        Self::get_instance().config.read().map(|c| c.memory_type_mapped).unwrap_or(false)
    }

    pub fn get_required_write() -> bool {
        Self::get_instance().config.read().map(|c| c.required_write).unwrap_or(true)
    }

    pub fn set_required_write(value: bool) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.required_write = value;
        }
        Self::save_config();
    }

    pub fn get_only_main_module_image() -> bool {
        Self::get_instance().config.read().map(|c| c.only_main_module_image).unwrap_or(true)
    }

    pub fn get_start_address() -> u64 {
        Self::get_instance().config.read().map(|c| c.start_address).unwrap_or(0)
    }

    pub fn get_end_address() -> u64 {
        Self::get_instance().config.read().map(|c| c.end_address).unwrap_or(u64::MAX)
    }

    pub fn get_only_query_usermode() -> bool {
        Self::get_instance().config.read().map(|c| c.only_query_usermode).unwrap_or(true)
    }

    pub fn set_only_query_usermode(value: bool) {
        if let Ok(mut config) = Self::get_instance().config.write() {
            config.only_query_usermode = value;
        }
        Self::save_config();
    }
}
