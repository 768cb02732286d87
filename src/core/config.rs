use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde_yaml::Value;

/// Parsed configuration document: top-level string keys to arbitrary values.
pub type ConfigMap = HashMap<String, Value>;

/// Load and parse a YAML configuration file.
///
/// Total over all inputs: a missing file, an unreadable file, a malformed
/// document, or a document whose top level is not a mapping all degrade to an
/// empty map. Callers never have to handle an error.
pub fn load_config(path: &Path) -> ConfigMap {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Config not found: {}", path.display());
            return ConfigMap::new();
        }
        Err(e) => {
            error!("Config read error for {}: {}", path.display(), e);
            return ConfigMap::new();
        }
    };

    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(mapping)) => mapping
            .into_iter()
            .filter_map(|(key, value)| key.as_str().map(|k| (k.to_string(), value)))
            .collect(),
        Ok(_) => ConfigMap::new(),
        Err(e) => {
            error!("YAML parse error in {}: {}", path.display(), e);
            ConfigMap::new()
        }
    }
}

/// Deserialize one config entry into a typed value.
///
/// Returns `None` when the key is absent or the value does not fit `T`.
pub fn section<T: DeserializeOwned>(config: &ConfigMap, key: &str) -> Option<T> {
    let value = config.get(key)?.clone();
    match serde_yaml::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Config section '{}' has unexpected shape: {}", key, e);
            None
        }
    }
}
