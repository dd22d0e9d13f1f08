//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `REGISTRAR_*` environment variables, CLI flags and an
//! optional config file. Unset optional values fall back to the defaults
//! exposed by the accessor methods.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_LOCK_TIMEOUT, NotificationPolicy, StorageBackend, UnknownBackend};
use crate::outbound::document::DEFAULT_NAMESPACE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";


/// Errors raised when configured values cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    Backend(#[from] UnknownBackend),
}

/// Configuration for the registrar server and its utilities.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRAR")]
pub struct RegistrarSettings {
    /// HTTP listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Redis connection URL for the document store.
    pub redis_url: Option<String>,
    /// Key prefix for document collections.
    pub document_namespace: Option<String>,
    /// Backend selected at startup.
    pub default_backend: Option<String>,
    /// HTTP mail relay endpoint for enrollment confirmations.
    pub notification_relay_url: Option<String>,
    /// Fail relational enrollments when the confirmation cannot be sent.
    #[ortho_config(default = false)]
    pub strict_relational_notifications: bool,
    /// Bound on waiting for a course's enrollment lock, in milliseconds.
    pub course_lock_timeout_ms: Option<u64>,
    /// Path to the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
}

impl RegistrarSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Backend the selector starts on.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Backend`] for names other than `relational`
    /// or `document`.
    pub fn default_backend(&self) -> Result<StorageBackend, SettingsError> {
        match self.default_backend.as_deref() {
            Some(name) => Ok(name.parse()?),
            None => Ok(StorageBackend::default()),
        }
    }

    /// Key prefix for document collections.
    pub fn document_namespace(&self) -> &str {
        self.document_namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Lock wait bound for enroll and drop.
    pub fn course_lock_timeout(&self) -> Duration {
        self.course_lock_timeout_ms
            .map_or(DEFAULT_LOCK_TIMEOUT, Duration::from_millis)
    }

    /// How notification failures affect enrollments.
    pub fn notification_policy(&self) -> NotificationPolicy {
        if self.strict_relational_notifications {
            NotificationPolicy::StrictOnRelational
        } else {
            NotificationPolicy::BestEffort
        }
    }

    /// Session key location.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}
