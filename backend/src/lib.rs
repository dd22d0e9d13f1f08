//! Course enrollment backend with interchangeable relational and document
//! stores.
//!
//! - [`domain`]: entities, services and the ports they depend on.
//! - [`inbound`]: actix-web handlers translating HTTP into port calls.
//! - [`outbound`]: Diesel, document-store and notification adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
