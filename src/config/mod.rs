//! Configuration management.
//!
//! This module loads and validates [`ClientConfig`] values and keeps the
//! process-wide configuration used by the static facade (`please::get` and
//! friends). Settings are read from a JSON document under the `"please"` key
//! and merged with defaults.

pub mod schema;

pub use schema::ClientConfig;

use crate::error::{Error, Result};
use log::warn;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::Path;
use std::sync::RwLock;

/// Key under which settings are looked up in a settings document.
pub const SETTINGS_KEY: &str = "please";

/// Global configuration instance.
static CONFIG: Lazy<RwLock<ClientConfig>> = Lazy::new(|| RwLock::new(ClientConfig::default()));

/// Loads configuration from a JSON settings document.
///
/// Reads the `"please"` settings, merges them with defaults, validates the
/// result, and updates the global configuration. Settings that fail to
/// deserialize are logged and ignored.
///
/// # Example
///
/// ```no_run
/// use please::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "please": {
///         "timeout": 60000,
///         "verifyCertificates": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 60000);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<ClientConfig> {
    let config = parse_settings(settings_json)?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Loads configuration from a JSON file.
///
/// The file may either hold a full settings document (with a `"please"` key)
/// or the client settings object directly.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let settings = if value.get(SETTINGS_KEY).is_some() {
        value
    } else {
        let mut wrapped = serde_json::Map::new();
        wrapped.insert(SETTINGS_KEY.to_string(), value);
        Value::Object(wrapped)
    };

    load_config(Some(settings))
}

fn parse_settings(settings_json: Option<Value>) -> Result<ClientConfig> {
    let mut config = ClientConfig::default();

    if let Some(settings) = settings_json {
        if let Some(client_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<ClientConfig>(client_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    warn!("failed to parse '{}' settings: {}; using defaults", SETTINGS_KEY, e);
                }
            }
        }
    }

    config.validate().map_err(Error::Config)?;
    Ok(config)
}

/// Gets a copy of the current global configuration.
pub fn get_config() -> ClientConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| ClientConfig::default())
}

/// Updates the global configuration in place.
///
/// If the update leaves the configuration invalid, it is reset to defaults.
///
/// # Example
///
/// ```no_run
/// use please::config::update_config;
///
/// update_config(|config| {
///     config.timeout = 60000;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut ClientConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            warn!("configuration invalid after update: {}; reverting to defaults", e);
            *config = ClientConfig::default();
        }
    }
}

/// Resets the global configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = ClientConfig::default();
    }
}
