//! Shared validation helpers for inbound HTTP adapters.
//!
//! Identifiers arrive either as relational numbers (`7`, `"7"`) or as opaque
//! document ids (`"STU007"`). Both decode through the identifier codec; a
//! value that decodes to no entity is a validation error here rather than a
//! silent lookup of id 0.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{CourseId, Error, Grade, StudentId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidIdentifier,
    InvalidGrade,
    UnknownBackend,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidIdentifier => "invalid_identifier",
            ErrorCode::InvalidGrade => "invalid_grade",
            ErrorCode::UnknownBackend => "unknown_backend",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Identifier as sent by clients: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ExternalId {
    /// Relational key.
    Numeric(i64),
    /// Numeric string or opaque document id.
    Text(String),
}

impl ExternalId {
    fn raw(&self) -> String {
        match self {
            Self::Numeric(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

macro_rules! id_parser {
    ($fn_name:ident, $ty:ty) => {
        pub(crate) fn $fn_name(value: &ExternalId, field: FieldName) -> Result<$ty, Error> {
            let decoded = match value {
                ExternalId::Numeric(n) => <$ty>::new(*n).ok(),
                ExternalId::Text(raw) => <$ty>::from_external(raw),
            };
            decoded.ok_or_else(|| invalid_identifier_error(field, &value.raw()))
        }
    };
}

id_parser!(parse_student_id, StudentId);
id_parser!(parse_course_id, CourseId);

pub(crate) fn invalid_identifier_error(field: FieldName, value: &str) -> Error {
    let field_name = field.as_str();
    field_error(
        field,
        ErrorCode::InvalidIdentifier,
        format!("{field_name} must be a positive number or a prefixed identifier"),
        value,
    )
}

/// Parse a path segment into an identifier.
pub(crate) fn parse_path_id<T>(
    raw: &str,
    field: FieldName,
    decode: impl FnOnce(&str) -> Option<T>,
) -> Result<T, Error> {
    decode(raw).ok_or_else(|| invalid_identifier_error(field, raw))
}

/// Parse an optional letter grade; `None` clears the grade.
pub(crate) fn parse_grade(value: Option<&str>, field: FieldName) -> Result<Option<Grade>, Error> {
    value
        .map(|raw| {
            raw.parse::<Grade>().map_err(|_| {
                field_error(
                    field,
                    ErrorCode::InvalidGrade,
                    format!("{} must be one of A, B, C, D, F or null", field.as_str()),
                    raw,
                )
            })
        })
        .transpose()
}

pub(crate) fn unknown_backend_error(field: FieldName, value: &str) -> Error {
    field_error(
        field,
        ErrorCode::UnknownBackend,
        "Invalid database type".to_owned(),
        value,
    )
}
