//! Configuration module for orr-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables. Also handles moderator secret hashing.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{
    IdentityConfig, ModeratorConfig, NotifyConfig, ServerConfig, SharedConfig,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub moderator: ModeratorConfig,
    pub identity: IdentityConfig,
    pub notify: NotifyConfig,
    /// Applied once at startup; a SIGHUP reload does not resize the cache.
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    /// Applied once at startup; changing the backend needs a restart.
    pub photo_storage_url: url::Url,
}

impl LoadedConfig {
    /// Convert the reloadable sections into a SharedConfig with
    /// Arc<RwLock<T>> wrappers.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig {
            server: Arc::new(RwLock::new(self.server)),
            moderator: Arc::new(RwLock::new(self.moderator)),
            identity: Arc::new(RwLock::new(self.identity)),
            notify: Arc::new(RwLock::new(self.notify)),
        }
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Hash the moderator secret if it's plaintext (and rewrite the file)
    /// 5. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        // Read the config file
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        // Apply CLI overrides
        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        // Validate the configuration
        self.validate(&file_config)?;

        // Hash moderator secret if needed and rewrite config
        let secret_hash = if file_config.is_moderator_secret_hashed() {
            file_config.moderator.secret.clone()
        } else {
            let hash = self.hash_secret(&file_config.moderator.secret)?;
            file_config.moderator.secret = hash.clone();
            self.rewrite_config(&file_config)?;
            tracing::info!("Moderator secret hashed and config file updated");
            hash
        };

        // Build the config parts
        Ok(Self::build_loaded_config(file_config, secret_hash))
    }

    /// Reload the configuration (used during SIGHUP).
    ///
    /// Returns a LoadedConfig that can be used to update individual parts
    /// of a SharedConfig.
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.identity.secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "identity secret must not be empty".to_string(),
            ));
        }
        if config.notify.operator_address.is_empty() {
            return Err(ConfigError::ValidationError(
                "notify operator_address must not be empty".to_string(),
            ));
        }
        if config.cache.ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "cache ttl_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn hash_secret(&self, plaintext: &str) -> Result<String, ConfigError> {
        use argon2::{
            Argon2, PasswordHasher,
            password_hash::{SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ConfigError::HashError(e.to_string()))
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }

    fn build_loaded_config(file_config: FileConfig, secret_hash: String) -> LoadedConfig {
        LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
            },
            moderator: ModeratorConfig::new(secret_hash),
            identity: IdentityConfig::new(
                file_config.identity.secret.into_bytes().into_boxed_slice(),
            ),
            notify: NotifyConfig {
                endpoint: file_config.notify.endpoint,
                api_key: file_config.notify.api_key,
                operator_address: file_config.notify.operator_address,
            },
            cache_ttl: Duration::from_secs(file_config.cache.ttl_seconds),
            cache_capacity: file_config.cache.capacity,
            photo_storage_url: file_config.photos.url,
        }
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
