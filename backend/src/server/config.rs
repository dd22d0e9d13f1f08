//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use registrar::domain::ports::EnrollmentNotifier;
use registrar::domain::{DEFAULT_LOCK_TIMEOUT, NotificationPolicy, StorageBackend};
use registrar::inbound::http::session_config::SessionSettings;
use registrar::outbound::document::{DocumentCollections, InMemoryCollections};
use registrar::outbound::notification::LoggingNotifier;
use registrar::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) collections: Arc<dyn DocumentCollections>,
    pub(crate) notifier: Arc<dyn EnrollmentNotifier>,
    pub(crate) initial_backend: StorageBackend,
    pub(crate) lock_timeout: Duration,
    pub(crate) notification_policy: NotificationPolicy,
}

impl ServerConfig {
    /// Construct a configuration with in-process collections, logged
    /// notifications and no database.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            collections: Arc::new(InMemoryCollections::new()),
            notifier: Arc::new(LoggingNotifier),
            initial_backend: StorageBackend::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            notification_policy: NotificationPolicy::default(),
        }
    }

    /// Attach a database connection pool for the relational adapters.
    ///
    /// Without one the relational slot, migration source and reset use
    /// fixtures that hold no data.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the document collections.
    #[must_use]
    pub fn with_document_collections(mut self, collections: Arc<dyn DocumentCollections>) -> Self {
        self.collections = collections;
        self
    }

    /// Replace the confirmation notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn EnrollmentNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Backend the selector starts on.
    #[must_use]
    pub fn with_initial_backend(mut self, backend: StorageBackend) -> Self {
        self.initial_backend = backend;
        self
    }

    /// Bound on waiting for a course lock.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// How notification failures affect enrollments.
    #[must_use]
    pub fn with_notification_policy(mut self, policy: NotificationPolicy) -> Self {
        self.notification_policy = policy;
        self
    }
}
