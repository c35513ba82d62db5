//! Runtime configuration types.
//!
//! These are the processed forms the request handlers read: the moderator
//! secret is only held as an argon2 hash, the identity secret as raw key
//! bytes. Swappable sections live behind `Arc<RwLock<..>>` so a SIGHUP
//! reload can replace them without restarting.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Server runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

/// Moderator authentication configuration.
pub struct ModeratorConfig {
    secret_hash: String,
}

impl ModeratorConfig {
    pub fn new(secret_hash: String) -> Self {
        Self { secret_hash }
    }

    /// Verify a presented plaintext secret against the stored hash.
    pub fn verify(&self, presented: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.secret_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Identity-provider verification configuration.
pub struct IdentityConfig {
    secret: Box<[u8]>,
}

impl IdentityConfig {
    pub fn new(secret: Box<[u8]>) -> Self {
        Self { secret }
    }

    pub fn secret_bytes(&self) -> &[u8] {
        &self.secret
    }
}

/// Email-provider configuration, converted into the core notifier's form
/// at startup.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub endpoint: url::Url,
    pub api_key: String,
    pub operator_address: String,
}

impl From<NotifyConfig> for orr_core::processors::NotifierConfig {
    fn from(value: NotifyConfig) -> Self {
        orr_core::processors::NotifierConfig {
            endpoint: value.endpoint,
            api_key: value.api_key,
            operator_address: value.operator_address,
        }
    }
}

/// Shared configuration with a separate lock per section.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub moderator: Arc<RwLock<ModeratorConfig>>,
    pub identity: Arc<RwLock<IdentityConfig>>,
    pub notify: Arc<RwLock<NotifyConfig>>,
}
