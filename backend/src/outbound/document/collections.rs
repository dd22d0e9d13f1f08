//! Key-value collection abstraction underneath the document store.
//!
//! Each collection maps string keys to serialised JSON documents. Redis keeps
//! one hash per collection; the in-memory implementation keeps one map. The
//! operations mirror single Redis commands, so none of them spans more than
//! one key and there are no multi-document transactions.

use async_trait::async_trait;

use crate::domain::ports::define_port_error;

define_port_error! {
    /// Errors raised by document collection backends.
    pub enum DocumentStoreError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "document store connection failed: {message}",
        /// A command was rejected or failed.
        Backend { message: String } =>
            "document store command failed: {message}",
        /// A stored document could not be encoded or decoded.
        Codec { message: String } =>
            "document could not be (de)serialised: {message}",
    }
}

/// Named collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Students, professors and administrators keyed by opaque user id.
    Users,
    /// Courses keyed by opaque course id.
    Courses,
    /// Enrollments keyed by opaque enrollment id.
    Enrollments,
    /// Departments keyed by opaque department id.
    Departments,
    /// Unique index: email to opaque user id.
    UserEmails,
    /// Unique index: `{studentId}:{courseId}` to opaque enrollment id.
    EnrollmentPairs,
}

impl Collection {
    /// Every collection, in clearing order.
    pub const ALL: [Self; 6] = [
        Self::EnrollmentPairs,
        Self::Enrollments,
        Self::Courses,
        Self::UserEmails,
        Self::Users,
        Self::Departments,
    ];

    /// Stable collection name used in storage keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Courses => "courses",
            Self::Enrollments => "enrollments",
            Self::Departments => "departments",
            Self::UserEmails => "user_emails",
            Self::EnrollmentPairs => "enrollment_pairs",
        }
    }
}

/// Minimal command set the document store needs from its backend.
#[async_trait]
pub trait DocumentCollections: Send + Sync {
    /// Read one document.
    async fn get(&self, collection: Collection, key: &str)
    -> Result<Option<String>, DocumentStoreError>;

    /// Write one document, replacing any previous value.
    async fn put(
        &self,
        collection: Collection,
        key: &str,
        value: String,
    ) -> Result<(), DocumentStoreError>;

    /// Write only if the key is absent; returns whether the write happened.
    async fn insert_new(
        &self,
        collection: Collection,
        key: &str,
        value: String,
    ) -> Result<bool, DocumentStoreError>;

    /// Remove one document; returns whether it existed.
    async fn delete(&self, collection: Collection, key: &str) -> Result<bool, DocumentStoreError>;

    /// Every document in the collection, in no particular order.
    async fn list(&self, collection: Collection) -> Result<Vec<String>, DocumentStoreError>;

    /// Remove every document and reset the collection's sequence.
    async fn clear(&self, collection: Collection) -> Result<(), DocumentStoreError>;

    /// Atomically increment and return the collection's key sequence.
    async fn next_sequence(&self, collection: Collection) -> Result<i64, DocumentStoreError>;

    /// Move the collection's key sequence to `value`.
    async fn set_sequence(
        &self,
        collection: Collection,
        value: i64,
    ) -> Result<(), DocumentStoreError>;
}
