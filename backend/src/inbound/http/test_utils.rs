//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::ports::{
    BackendAdmin, CourseQuery, DatabaseResetCommand, EnrollmentCommand, FixtureBackendAdmin,
    FixtureEnrollmentCommand, LoginService, MockDatabaseResetCommand, MockLoginService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state with fixtures in every slot unless overridden.
///
/// Login and reset default to mocks without expectations, so a test that
/// reaches them unexpectedly fails loudly.
pub struct TestState {
    ports: HttpStatePorts,
}

impl Default for TestState {
    fn default() -> Self {
        Self {
            ports: HttpStatePorts {
                enrollments: Arc::new(FixtureEnrollmentCommand),
                courses: Arc::new(FixtureEnrollmentCommand),
                admin: Arc::new(FixtureBackendAdmin::default()),
                login: Arc::new(MockLoginService::new()),
                reset: Arc::new(MockDatabaseResetCommand::new()),
            },
        }
    }
}

impl TestState {
    pub fn with_enrollments(mut self, command: impl EnrollmentCommand + 'static) -> Self {
        self.ports.enrollments = Arc::new(command);
        self
    }

    pub fn with_courses(mut self, query: impl CourseQuery + 'static) -> Self {
        self.ports.courses = Arc::new(query);
        self
    }

    pub fn with_admin(mut self, admin: impl BackendAdmin + 'static) -> Self {
        self.ports.admin = Arc::new(admin);
        self
    }

    pub fn with_login(mut self, login: impl LoginService + 'static) -> Self {
        self.ports.login = Arc::new(login);
        self
    }

    pub fn with_reset(mut self, reset: impl DatabaseResetCommand + 'static) -> Self {
        self.ports.reset = Arc::new(reset);
        self
    }

    pub fn build(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(self.ports))
    }
}
