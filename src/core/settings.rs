// Atomic settings persistence

use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use log::warn;
use once_cell::sync::OnceCell;

use crate::core::paths;
use crate::error::{CcError, Result};

/// One-file-per-key settings persistence.
///
/// Keys map to files under the settings directory. Every write goes through a
/// unique temp file in the same directory, an fsync and an atomic rename, so
/// a reader always sees either the complete old value or the complete new
/// one. There is no cross-key locking; concurrent writers to the same key
/// race at the filesystem level, last rename wins.
pub struct SettingsStore {
    base: PathBuf,
    resolved: OnceCell<PathBuf>,
}

impl SettingsStore {
    /// Store rooted at the XDG settings directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(paths::settings_dir()?))
    }

    /// Store rooted at an explicit directory.
    pub fn at(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            resolved: OnceCell::new(),
        }
    }

    /// Create the settings directory (once) and return its canonical path.
    fn resolved_dir(&self) -> Result<&Path> {
        let path = self.resolved.get_or_try_init(|| -> Result<PathBuf> {
            fs::create_dir_all(&self.base)?;
            Ok(self.base.canonicalize()?)
        })?;
        Ok(path)
    }

    /// Validate a settings key and return its on-disk path.
    ///
    /// Rejects empty keys, NUL bytes, rooted keys, `..` components and
    /// anything that would resolve outside the settings directory, symlinks
    /// included. Lexical rejection happens before the directory is resolved,
    /// so an invalid key touches nothing on disk.
    fn key_path(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() {
            return None;
        }
        if key.contains('\0') {
            warn!("Invalid null byte in settings key: {:?}", key);
            return None;
        }

        let relative = match normalize_key(key) {
            Some(relative) => relative,
            None => {
                warn!("Path traversal or invalid key blocked: {:?}", key);
                return None;
            }
        };

        let base = match self.resolved_dir() {
            Ok(base) => base.to_path_buf(),
            Err(e) => {
                warn!("Settings directory unavailable: {}", e);
                return None;
            }
        };

        let candidate = base.join(relative);
        match contained_in(&candidate, &base) {
            Ok(true) => Some(candidate),
            Ok(false) => {
                warn!("Path traversal or invalid key blocked: {:?}", key);
                None
            }
            Err(e) => {
                warn!("Cannot resolve settings key {:?}: {}", key, e);
                None
            }
        }
    }

    /// Atomically save a string value.
    pub fn save_str(&self, key: &str, value: &str) {
        self.save_rendered(key, value.to_string());
    }

    /// Atomically save a boolean, rendered as `0`/`1` when `as_int` is set.
    pub fn save_bool(&self, key: &str, value: bool, as_int: bool) {
        let rendered = if as_int {
            if value { "1" } else { "0" }.to_string()
        } else {
            value.to_string()
        };
        self.save_rendered(key, rendered);
    }

    /// Atomically save an integer value.
    pub fn save_int(&self, key: &str, value: i64) {
        self.save_rendered(key, value.to_string());
    }

    /// Atomically save a floating-point value.
    pub fn save_float(&self, key: &str, value: f64) {
        self.save_rendered(key, value.to_string());
    }

    fn save_rendered(&self, key: &str, content: String) {
        let Some(path) = self.key_path(key) else {
            return;
        };
        if let Err(e) = write_atomic(&path, &content) {
            warn!("Failed to save setting '{}': {}", key, e);
        }
    }

    /// Load a string value, or the default when absent or unreadable.
    pub fn load_string(&self, key: &str, default: &str) -> String {
        self.read_trimmed(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Load a boolean value.
    ///
    /// Accepts a numeric form (non-zero is true) or one of `true`, `yes`,
    /// `on`, `1` case-insensitively; any other token is false. The result is
    /// XORed with `is_inversed`.
    pub fn load_bool(&self, key: &str, default: bool, is_inversed: bool) -> bool {
        match self.read_trimmed(key) {
            Some(value) => parse_bool(&value, is_inversed),
            None => default,
        }
    }

    /// Load an integer value, or the default when absent or unparseable.
    pub fn load_int(&self, key: &str, default: i64) -> i64 {
        let Some(value) = self.read_trimmed(key) else {
            return default;
        };
        match value.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to parse setting '{}' value '{}': {}", key, value, e);
                default
            }
        }
    }

    /// Load a floating-point value, or the default when absent or unparseable.
    pub fn load_float(&self, key: &str, default: f64) -> f64 {
        let Some(value) = self.read_trimmed(key) else {
            return default;
        };
        match value.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to parse setting '{}' value '{}': {}", key, value, e);
                default
            }
        }
    }

    fn read_trimmed(&self, key: &str) -> Option<String> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to load setting '{}': {}", key, e);
                None
            }
        }
    }
}

/// Fold a key into a normalized relative path.
///
/// `.` components are dropped; any `..`, rooted or prefixed key is rejected
/// outright. A key that folds to nothing (it names the settings directory
/// itself) is rejected too.
fn normalize_key(key: &str) -> Option<PathBuf> {
    let mut parts: Vec<&OsStr> = Vec::new();
    for component in Path::new(key).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.iter().copied().collect())
}

/// Symlink-aware containment check.
///
/// The canonical form of the candidate's deepest existing ancestor must stay
/// inside the canonical base; the not-yet-existing tail below it cannot
/// introduce symlinks.
fn contained_in(candidate: &Path, base: &Path) -> io::Result<bool> {
    let mut probe = candidate;
    loop {
        match probe.canonicalize() {
            Ok(real) => return Ok(real.starts_with(base)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                probe = match probe.parent() {
                    Some(parent) => parent,
                    None => return Ok(false),
                };
            }
            Err(e) => return Err(e),
        }
    }
}

/// Write via a unique temp file in the target directory, fsync, then rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| CcError::settings("key path has no parent"))?;
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    // Atomic on POSIX; the temp file deletes itself on every earlier exit
    tmp.persist(path).map_err(|e| CcError::Io(e.error))?;
    Ok(())
}

/// Parse a string as boolean, optionally inverting the result.
fn parse_bool(value: &str, is_inversed: bool) -> bool {
    let result = match value.parse::<i64>() {
        Ok(number) => number != 0,
        Err(_) => matches!(value.to_lowercase().as_str(), "true" | "yes" | "on" | "1"),
    };
    result ^ is_inversed
}
