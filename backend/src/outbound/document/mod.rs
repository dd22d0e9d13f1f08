//! Document-store adapters.
//!
//! The document backend keeps denormalised JSON documents in named
//! collections: users embed their enrolled-course summaries and credit
//! totals, courses embed seat and enrollment counters plus a capped log of
//! recent enrollments. Collections live in Redis ([`RedisCollections`]) or,
//! without a Redis URL, in process memory ([`InMemoryCollections`]).
//!
//! - [`DocumentEnrollmentStore`]: the document [`EnrollmentStore`].
//! - [`DocumentImporter`]: rebuilds every collection from a relational
//!   snapshot.
//!
//! [`EnrollmentStore`]: crate::domain::ports::EnrollmentStore

mod collections;
pub(crate) mod documents;
mod importer;
mod memory;
mod redis_collections;
mod store;

pub use collections::{Collection, DocumentCollections, DocumentStoreError};
pub use documents::{
    CourseDocument, DepartmentDocument, EnrolledCourse, EnrollmentDocument,
    RECENT_ENROLLMENTS_CAP, RecentEnrollment, UserDocument,
};
pub use importer::DocumentImporter;
pub use memory::InMemoryCollections;
pub use redis_collections::{DEFAULT_NAMESPACE, RedisCollections};
pub use store::DocumentEnrollmentStore;
