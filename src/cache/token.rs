use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Keyring service name shared by all token entries
const SERVICE_NAME: &str = "platewise";

/// File name of the fallback token store inside the cache directory
const TOKEN_FILE: &str = "tokens.json";

/// Storage backend for token entries.
#[async_trait]
pub trait TokenBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Backend storing each token as an OS keychain entry.
pub struct KeyringBackend;

impl KeyringBackend {
    fn entry(key: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, key).context("Failed to create keyring entry")
    }
}

#[async_trait]
impl TokenBackend for KeyringBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .context("Failed to store token in keychain")
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

/// A token value plus the time it was written. `saved_at` is diagnostic only.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    value: String,
    saved_at: DateTime<Utc>,
}

/// Fallback backend persisting tokens as a JSON map on disk.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            path: cache_dir.join(TOKEN_FILE),
        }
    }

    fn load_map(&self) -> Result<HashMap<String, StoredToken>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file: {}", self.path.display()))
    }

    fn save_map(&self, map: &HashMap<String, StoredToken>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write token file: {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl TokenBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_map()?.remove(key).map(|t| t.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load_map().unwrap_or_else(|e| {
            warn!(error = %e, "Token file unreadable, starting a fresh one");
            HashMap::new()
        });
        map.insert(
            key.to_string(),
            StoredToken {
                value: value.to_string(),
                saved_at: Utc::now(),
            },
        );
        self.save_map(&map)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut map = self.load_map()?;
        if map.remove(key).is_some() {
            self.save_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory backend for tests and platforms without persistence.
#[derive(Default)]
pub struct MemoryBackend {
    map: std::sync::Mutex<HashMap<String, String>>,
}

#[async_trait]
impl TokenBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.lock().expect("token map lock").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .lock()
            .expect("token map lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.map.lock().expect("token map lock").remove(key);
        Ok(())
    }
}

/// Dual-backend token cache.
///
/// Writes go to the secure backend on a best-effort basis and are always
/// mirrored to the general backend. Reads prefer the secure backend and fall
/// back to the general one when the secure read finds nothing or fails.
/// Callers never see an error: every backend failure is logged and swallowed,
/// and a failed lookup behaves like an absent token.
pub struct TokenCache {
    secure: Arc<dyn TokenBackend>,
    general: Arc<dyn TokenBackend>,
}

impl TokenCache {
    pub fn new(secure: Arc<dyn TokenBackend>, general: Arc<dyn TokenBackend>) -> Self {
        Self { secure, general }
    }

    /// Cache wired to the OS keyring with a JSON file under `cache_dir` as
    /// the fallback. Returns `None` on platforms without local storage,
    /// where sessions simply do not survive a restart.
    pub fn platform_default(cache_dir: PathBuf) -> Option<Self> {
        if cfg!(target_family = "wasm") {
            return None;
        }
        Some(Self::new(
            Arc::new(KeyringBackend),
            Arc::new(FileBackend::new(cache_dir)),
        ))
    }

    /// Look up a token, preferring the secure backend.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.secure.get(key).await {
            Ok(Some(value)) => {
                debug!(key, "token read from secure store");
                return Some(value);
            }
            Ok(None) => {}
            Err(e) => warn!(key, error = %e, "Secure store read failed, trying fallback"),
        }

        match self.general.get(key).await {
            Ok(Some(value)) => {
                debug!(key, "token read from fallback store");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "no token stored");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Fallback store read failed");
                None
            }
        }
    }

    /// Store a token in both backends. The general backend always receives
    /// the latest value, even when the secure write fails.
    pub async fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.secure.set(key, value).await {
            warn!(key, error = %e, "Secure store write failed");
        }
        if let Err(e) = self.general.set(key, value).await {
            warn!(key, error = %e, "Fallback store write failed");
        }
    }

    /// Remove a token from both backends. Each removal is independent, so a
    /// failure in one backend never leaves the other holding the token.
    pub async fn clear(&self, key: &str) {
        if let Err(e) = self.secure.delete(key).await {
            warn!(key, error = %e, "Secure store delete failed");
        }
        if let Err(e) = self.general.delete(key).await {
            warn!(key, error = %e, "Fallback store delete failed");
        }
    }
}
