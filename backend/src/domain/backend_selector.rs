//! Runtime choice between the relational and document stores.
//!
//! A [`BackendSelector`] is created once at start-up and shared by `Arc`
//! between the enrollment service and the administrative endpoints. Switching
//! only affects calls that start afterwards; nothing is reconciled between
//! the stores.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Storage backend kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Normalised PostgreSQL schema.
    #[default]
    Relational,
    /// Denormalised document collections.
    Document,
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown storage backend {0:?}; expected \"relational\" or \"document\"")]
pub struct UnknownBackend(pub String);

impl StorageBackend {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relational => "relational",
            Self::Document => "document",
        }
    }

    const fn to_bits(self) -> u8 {
        match self {
            Self::Relational => 0,
            Self::Document => 1,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Self::Document,
            _ => Self::Relational,
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relational" => Ok(Self::Relational),
            "document" => Ok(Self::Document),
            other => Err(UnknownBackend(other.to_owned())),
        }
    }
}

/// Shared pointer to the active storage backend.
///
/// # Examples
/// ```
/// use registrar::domain::{BackendSelector, StorageBackend};
///
/// let selector = BackendSelector::new(StorageBackend::Relational);
/// selector.switch_to(StorageBackend::Document);
/// assert_eq!(selector.current(), StorageBackend::Document);
/// ```
#[derive(Debug)]
pub struct BackendSelector {
    current: AtomicU8,
}

impl BackendSelector {
    /// Create a selector starting at `initial`.
    pub const fn new(initial: StorageBackend) -> Self {
        Self {
            current: AtomicU8::new(initial.to_bits()),
        }
    }

    /// Backend consulted by the next operation.
    pub fn current(&self) -> StorageBackend {
        StorageBackend::from_bits(self.current.load(Ordering::Acquire))
    }

    /// Point subsequent operations at `backend`, returning the previous value.
    pub fn switch_to(&self, backend: StorageBackend) -> StorageBackend {
        StorageBackend::from_bits(self.current.swap(backend.to_bits(), Ordering::AcqRel))
    }
}

impl Default for BackendSelector {
    fn default() -> Self {
        Self::new(StorageBackend::default())
    }
}
