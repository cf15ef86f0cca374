//! Configuration and persisted preferences

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::controller::SimulatedBackend;

/// Environment override for the simulated submit delay
const SUBMIT_DELAY_ENV: &str = "LINGUA_FORMS_SUBMIT_DELAY_MS";

/// Preference key for the login form's "remember me" checkbox
pub const REMEMBER_ME_KEY: &str = "rememberMe";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "lingua", "lingua-forms")
}

/// User configuration for the app
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Simulated backend latency in milliseconds
    pub submit_delay_ms: Option<u64>,
    /// View shown at startup ("login" or "trial")
    pub start_view: Option<String>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Submit delay, with the environment taking precedence over the file
    pub fn submit_delay(&self) -> Duration {
        let from_env = std::env::var(SUBMIT_DELAY_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok());
        from_env
            .or(self.submit_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or_else(|| SimulatedBackend::default().delay())
    }
}

/// Key-value storage for small user preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Preferences kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Preferences stored as a JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl JsonPreferenceStore {
    /// Open the store in the user's config directory
    pub fn open_default() -> Result<Self> {
        Self::open(project_dirs().map(|dirs| dirs.config_dir().join("preferences.json")))
    }

    /// Open the store at `path`; `None` keeps everything in memory
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let values = match &path {
            Some(path) if path.exists() => serde_json::from_str(&fs::read_to_string(path)?)?,
            _ => BTreeMap::new(),
        };
        Ok(Self { path, values })
    }

    fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&self.values)?;
            fs::write(path, content)?;
        }
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        self.save()
    }
}

/// Read the "remember me" flag
pub fn load_remember_me(store: &dyn PreferenceStore) -> bool {
    store.get(REMEMBER_ME_KEY).as_deref() == Some("true")
}

/// Write the "remember me" flag; unchecking removes the key
pub fn save_remember_me(store: &mut dyn PreferenceStore, remember: bool) -> Result<()> {
    if remember {
        store.set(REMEMBER_ME_KEY, "true")
    } else {
        store.remove(REMEMBER_ME_KEY)
    }
}
