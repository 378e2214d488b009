pub mod memory_settings_config;
