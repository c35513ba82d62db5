//! TOML file configuration structures.
//!
//! These structs directly map to the `orr-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub moderator: ModeratorConfig,
    pub identity: IdentityConfig,
    pub notify: NotifyConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub photos: PhotoStorageConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Moderator configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratorConfig {
    /// The moderator secret. If this is plaintext (doesn't start with
    /// `$argon2`), it will be hashed and the config file will be rewritten.
    pub secret: String,
}

/// Identity-provider configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Shared secret used to verify `Orr-Identity` tokens minted by the
    /// identity provider.
    pub secret: String,
}

/// Email-provider configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Provider endpoint receiving message POSTs.
    pub endpoint: url::Url,
    /// Provider API key, sent as a bearer token.
    pub api_key: String,
    /// Address receiving operator mail for new submissions.
    pub operator_address: String,
}

/// Derived-cache configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_capacity() -> u64 {
    10_000
}

/// Photo object-storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoStorageConfig {
    /// Backend URL, e.g. `file:///var/lib/orr/photos` or `memory:///`.
    pub url: url::Url,
}

impl FileConfig {
    /// Check if the moderator secret is already hashed (argon2 format).
    pub fn is_moderator_secret_hashed(&self) -> bool {
        self.moderator.secret.starts_with("$argon2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[moderator]
secret = "test-secret"

[identity]
secret = "provider-secret"

[notify]
endpoint = "https://mail.example.org/v1/send"
api_key = "key123"
operator_address = "mods@example.org"

[photos]
url = "memory:///"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.notify.operator_address, "mods@example.org");
        assert_eq!(config.cache.ttl_seconds, 300);
        assert!(!config.is_moderator_secret_hashed());
    }

    #[test]
    fn test_hashed_secret_detection() {
        let config = FileConfig {
            server: ServerConfig {
                listen: default_listen_addr(),
            },
            moderator: ModeratorConfig {
                secret: "$argon2id$v=19$m=19456,t=2,p=1$abc123".to_string(),
            },
            identity: IdentityConfig {
                secret: "provider-secret".to_string(),
            },
            notify: NotifyConfig {
                endpoint: "https://mail.example.org/v1/send".parse().unwrap(),
                api_key: "key123".to_string(),
                operator_address: "mods@example.org".to_string(),
            },
            cache: CacheConfig::default(),
            photos: PhotoStorageConfig {
                url: "memory:///".parse().unwrap(),
            },
        };
        assert!(config.is_moderator_secret_hashed());
    }
}
