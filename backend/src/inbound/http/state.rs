//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BackendAdmin, CourseQuery, DatabaseResetCommand, EnrollmentCommand, LoginService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub courses: Arc<dyn CourseQuery>,
    pub admin: Arc<dyn BackendAdmin>,
    pub login: Arc<dyn LoginService>,
    pub reset: Arc<dyn DatabaseResetCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub courses: Arc<dyn CourseQuery>,
    pub admin: Arc<dyn BackendAdmin>,
    pub login: Arc<dyn LoginService>,
    pub reset: Arc<dyn DatabaseResetCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use registrar::domain::ports::{FixtureBackendAdmin, FixtureEnrollmentCommand};
    /// # use registrar::domain::ports::{DatabaseResetCommand, LoginService};
    /// use registrar::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// # fn ports(login: Arc<dyn LoginService>, reset: Arc<dyn DatabaseResetCommand>) {
    /// let state = HttpState::new(HttpStatePorts {
    ///     enrollments: Arc::new(FixtureEnrollmentCommand),
    ///     courses: Arc::new(FixtureEnrollmentCommand),
    ///     admin: Arc::new(FixtureBackendAdmin::default()),
    ///     login,
    ///     reset,
    /// });
    /// let _admin = state.admin.clone();
    /// # }
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            enrollments,
            courses,
            admin,
            login,
            reset,
        } = ports;
        Self {
            enrollments,
            courses,
            admin,
            login,
            reset,
        }
    }
}
