//! Persisted per-user settings.
//!
//! The store is a flat JSON object on disk. Values are kept as
//! `serde_json::Value` so strings, numbers and booleans survive a round trip
//! unchanged. Every mutation is written back immediately; there is no
//! protection against two processes writing at once.

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const API_URL_KEY: &str = "apiUrl";
pub const API_KEY_KEY: &str = "apiKey";
pub const LAST_UPDATE_CHECK_KEY: &str = "lastUpdateCheck";
pub const AUTO_UPDATE_DISABLED_KEY: &str = "autoUpdateCheckDisabled";

const APP_DIR: &str = "gis.ph";
const CONFIG_FILENAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl ConfigStore {
    /// Default location: `<user config dir>/gis.ph/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
    }

    /// Load the store at `path`, or start empty if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            debug!(path = %path.display(), "config file missing, starting empty");
            return Ok(Self {
                path,
                values: Map::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let values = if content.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => map,
                _ => {
                    return Err(Error::Config(format!(
                        "{} does not contain a JSON object",
                        path.display()
                    )))
                }
            }
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value for `key`; empty strings count as unset.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) -> Result<()> {
        self.values.insert(key.to_string(), value.into());
        self.save()
    }

    /// Remove `key`. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let existed = self.values.shift_remove(key).is_some();
        self.save()?;
        Ok(existed)
    }

    pub fn list(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn api_url(&self) -> Option<&str> {
        self.get_str(API_URL_KEY)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.get_str(API_KEY_KEY)
    }

    pub fn auto_update_disabled(&self) -> bool {
        self.get(AUTO_UPDATE_DISABLED_KEY).and_then(Value::as_bool) == Some(true)
    }

    pub fn set_auto_update_disabled(&mut self, disabled: bool) -> Result<()> {
        self.set(AUTO_UPDATE_DISABLED_KEY, disabled)
    }

    pub fn last_update_check(&self) -> Option<DateTime<Utc>> {
        self.get(LAST_UPDATE_CHECK_KEY)
            .and_then(Value::as_i64)
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }

    pub fn record_update_check(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.set(LAST_UPDATE_CHECK_KEY, at.timestamp_millis())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}
