// XDG base directory resolution

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::{CcError, Result};

/// Cache subdirectory name under XDG_CACHE_HOME
pub const CACHE_SUBDIR: &str = "nimbuscc";

/// Settings subdirectory under XDG_CONFIG_HOME
pub const SETTINGS_SUBDIR: &str = "nimbus/settings";

/// Resolve an XDG base directory from an environment value.
///
/// Empty or whitespace-only values are treated as unset, falling back to the
/// home-relative default. `dirs` alone does not give us this: the desktop
/// entry may export `XDG_CACHE_HOME=""`, which must behave like an absent
/// variable.
fn xdg_path_from(value: Option<&str>, default_suffix: &str) -> Result<PathBuf> {
    if let Some(v) = value {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(default_suffix))
        .ok_or_else(|| CcError::path("could not determine home directory"))
}

fn xdg_env(var: &str, default_suffix: &str) -> Result<PathBuf> {
    let value = env::var(var).ok();
    xdg_path_from(value.as_deref(), default_suffix)
}

/// XDG cache home, honoring `XDG_CACHE_HOME` with `~/.cache` as fallback.
pub fn xdg_cache_home() -> Result<PathBuf> {
    xdg_env("XDG_CACHE_HOME", ".cache")
}

/// XDG config home, honoring `XDG_CONFIG_HOME` with `~/.config` as fallback.
pub fn xdg_config_home() -> Result<PathBuf> {
    xdg_env("XDG_CONFIG_HOME", ".config")
}

/// Get or create the application cache directory.
///
/// Idempotent and safe under concurrent calls; `create_dir_all` tolerates the
/// directory already existing.
pub fn cache_dir() -> Result<PathBuf> {
    let dir = xdg_cache_home()?.join(CACHE_SUBDIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// The settings directory path.
///
/// Not created here; the settings store creates and canonicalizes it on
/// first use.
pub fn settings_dir() -> Result<PathBuf> {
    Ok(xdg_config_home()?.join(SETTINGS_SUBDIR))
}
