//! Driving ports for login and database maintenance.
//!
//! Inbound adapters call these without knowing which store answers, so
//! handler tests can substitute doubles instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Role, SeedSummary, UserRef};

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account reference.
    pub id: UserRef,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: Role,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error>;
}

/// Rebuilds the relational store from generated seed data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseResetCommand: Send + Sync {
    /// Wipe and reseed, returning the inserted row counts.
    async fn reset(&self) -> Result<SeedSummary, Error>;
}
