// Nimbus Control Center support library - Public API

// Re-export error types
pub mod error;
pub use error::{CcError, Result};

// Module declarations
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::{load_config, section, ConfigMap};
pub use crate::core::exec::{build_command_line, execute_command, preflight_check};
pub use crate::core::paths::{cache_dir, settings_dir};
pub use crate::core::settings::SettingsStore;
pub use crate::core::system_info::{
    ProcProbe, SystemInfoCache, SystemInfoKey, SystemProbe, LABEL_NA,
};
pub use crate::ui::notify::{Toast, ToastSurface, UiNotifier};

/// Long-lived service bundle for the control center.
///
/// Construct once at process start, on the UI thread (the notifier binds
/// toast delivery to the constructing thread), then hand out references to
/// worker threads. All public operations on the services are thread-safe.
pub struct Services {
    pub settings: SettingsStore,
    pub system_info: SystemInfoCache,
    pub notifier: UiNotifier,
}

impl Services {
    pub fn init() -> Result<Self> {
        Ok(Self {
            settings: SettingsStore::open_default()?,
            system_info: SystemInfoCache::new(),
            notifier: UiNotifier::new(),
        })
    }
}

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
