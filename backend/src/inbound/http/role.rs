//! Caller role extraction for privileged endpoints.
//!
//! The role comes from the `X-User-Role` header when present, otherwise from
//! the session established at login. The header is trusted as sent; it is an
//! interface contract with the dashboard rather than an authentication
//! mechanism.

use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::json;

use crate::domain::{Error, Role};
use crate::inbound::http::session::SessionContext;

/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Role of the caller, resolved before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerRole(Role);

impl CallerRole {
    /// Resolved role.
    pub const fn role(self) -> Role {
        self.0
    }

    /// Require maintenance privileges.
    pub fn require_administrative(self) -> Result<Role, Error> {
        if self.0.is_administrative() {
            Ok(self.0)
        } else {
            Err(Error::forbidden("administrative role required")
                .with_details(json!({ "role": self.0.as_str() })))
        }
    }

    /// Require grading privileges.
    pub fn require_grader(self) -> Result<Role, Error> {
        if self.0.can_grade() {
            Ok(self.0)
        } else {
            Err(Error::forbidden("professor or administrative role required")
                .with_details(json!({ "role": self.0.as_str() })))
        }
    }
}

fn role_from_headers(headers: &HeaderMap) -> Result<Option<Role>, Error> {
    let Some(value) = headers.get(USER_ROLE_HEADER) else {
        return Ok(None);
    };
    let invalid = |value: &str| {
        Error::invalid_request(format!("{USER_ROLE_HEADER} header names an unknown role"))
            .with_details(json!({
                "field": USER_ROLE_HEADER,
                "value": value,
                "code": "unknown_role",
            }))
    };
    let raw = value.to_str().map_err(|_| invalid("<non-ascii>"))?;
    raw.parse::<Role>().map(Some).map_err(|_| invalid(raw))
}

impl FromRequest for CallerRole {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let from_header = role_from_headers(req.headers());
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            if let Some(role) = from_header? {
                return Ok(Self(role));
            }
            let session = session.await?;
            let role = session
                .role()?
                .ok_or_else(|| Error::unauthorized("caller role required"))?;
            Ok(Self(role))
        })
    }
}
