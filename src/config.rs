//! Application configuration management.
//!
//! Deploy-time settings come from the environment (a `.env` file is honored
//! at startup); remembered state like the last signed-in email lives at
//! `~/.config/platewise/config.json`.
//!
//! The identity provider's publishable key has no usable default, so a
//! missing key fails configuration loading and with it app startup.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "platewise";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the identity provider publishable key
pub const PUBLISHABLE_KEY_VAR: &str = "PLATEWISE_PUBLISHABLE_KEY";

/// Environment variable overriding the identity provider base URL
const IDENTITY_URL_VAR: &str = "PLATEWISE_IDENTITY_URL";

/// Environment variable overriding the profile store base URL
const PROFILE_URL_VAR: &str = "PLATEWISE_PROFILE_URL";

/// Hosted identity provider client API
const DEFAULT_IDENTITY_URL: &str = "https://identity.platewise.app/v1/client";

/// Hosted profile document store
const DEFAULT_PROFILE_URL: &str = "https://api.platewise.app/v1";

/// Remembered state persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub last_email: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = Self::settings_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn settings_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub publishable_key: String,
    pub identity_url: String,
    pub profile_url: String,
    pub settings: Settings,
}

impl Config {
    /// Load configuration from the environment and the settings file.
    pub fn load() -> Result<Self> {
        let settings = match Settings::load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };

        Self::from_vars(
            std::env::var(PUBLISHABLE_KEY_VAR).ok(),
            std::env::var(IDENTITY_URL_VAR).ok(),
            std::env::var(PROFILE_URL_VAR).ok(),
            settings,
        )
    }

    /// Assemble a config from raw environment values.
    pub fn from_vars(
        publishable_key: Option<String>,
        identity_url: Option<String>,
        profile_url: Option<String>,
        settings: Settings,
    ) -> Result<Self> {
        let publishable_key = publishable_key.unwrap_or_default();
        if publishable_key.trim().is_empty() {
            anyhow::bail!(
                "Missing {} - set it in the environment or a .env file",
                PUBLISHABLE_KEY_VAR
            );
        }

        Ok(Self {
            publishable_key,
            identity_url: identity_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IDENTITY_URL.to_string()),
            profile_url: profile_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_URL.to_string()),
            settings,
        })
    }

    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_publishable_key_is_fatal() {
        let result = Config::from_vars(None, None, None, Settings::default());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains(PUBLISHABLE_KEY_VAR));
    }

    #[test]
    fn test_blank_publishable_key_is_fatal() {
        let result = Config::from_vars(Some("   ".to_string()), None, None, Settings::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_urls_default_when_unset() {
        let config = Config::from_vars(
            Some("pk_test_123".to_string()),
            None,
            None,
            Settings::default(),
        )
        .unwrap();

        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.profile_url, DEFAULT_PROFILE_URL);
    }

    #[test]
    fn test_url_overrides_are_honored() {
        let config = Config::from_vars(
            Some("pk_test_123".to_string()),
            Some("http://localhost:9001".to_string()),
            Some("http://localhost:9002".to_string()),
            Settings::default(),
        )
        .unwrap();

        assert_eq!(config.identity_url, "http://localhost:9001");
        assert_eq!(config.profile_url, "http://localhost:9002");
    }
}
