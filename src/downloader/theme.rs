// Dark-mode preference and the key-value stores backing it

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::StorageError;
use super::traits::KeyValueStore;

/// Storage key for the theme flag
pub const THEME_KEY: &str = "theme";
const DARK: &str = "dark";
const LIGHT: &str = "light";

/// Dark-mode flag, read once at startup and written on every toggle
pub struct ThemePreference {
    store: Box<dyn KeyValueStore>,
    dark: bool,
}

impl ThemePreference {
    /// Load from storage. Anything other than "dark" means light.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let dark = store.get(THEME_KEY).as_deref() == Some(DARK);
        tracing::debug!("[Theme] Loaded preference: dark={}", dark);
        Self { store, dark }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Flip and persist. The in-memory flag flips even if the write fails.
    pub fn toggle(&mut self) -> Result<bool, StorageError> {
        self.dark = !self.dark;
        let value = if self.dark { DARK } else { LIGHT };
        self.store.set(THEME_KEY, value)?;
        Ok(self.dark)
    }

    /// Give the store back, e.g. to reload from it
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }
}

/// Process-local store, used by tests and `--ephemeral` runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten on every `set`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open the file, starting empty if it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("[Theme] Ignoring unreadable settings {}: {}", path.display(), e);
                }
                HashMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<HashMap<String, String>, StorageError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_light() {
        let theme = ThemePreference::load(Box::new(MemoryStore::new()));
        assert!(!theme.is_dark());

        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "solarized").unwrap();
        assert!(!ThemePreference::load(Box::new(store)).is_dark());
    }

    #[test]
    fn test_toggle_survives_reload() {
        let mut theme = ThemePreference::load(Box::new(MemoryStore::new()));
        assert_eq!(theme.toggle(), Ok(true));

        let reloaded = ThemePreference::load(theme.into_store());
        assert!(reloaded.is_dark());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut theme = ThemePreference::load(Box::new(JsonFileStore::open(&path)));
        theme.toggle().unwrap();
        theme.toggle().unwrap();
        theme.toggle().unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
        assert!(ThemePreference::load(Box::new(reopened)).is_dark());
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get(THEME_KEY), None);
    }
}
