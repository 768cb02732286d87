// Core business logic module

pub mod config;
pub mod exec;
pub mod paths;
pub mod settings;
pub mod system_info;

// Re-export commonly used items
pub use self::config::ConfigMap;
pub use self::settings::SettingsStore;
pub use self::system_info::{SystemInfoCache, SystemInfoKey};
