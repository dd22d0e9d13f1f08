//! Identifier codec between relational keys and opaque document ids.
//!
//! The relational store keys every entity by a positive integer; the
//! document store uses a prefixed, zero-padded string (`7` for a student
//! becomes `"STU007"`). [`encode`] and [`decode`] convert between the two.
//!
//! Decoding is deliberately lenient: every non-digit character is discarded
//! and the remainder parsed, so `"7"`, `"STU007"` and `"ENR00007"` all decode
//! to `7`. Input with no digits, or digits that overflow, decodes to `0`,
//! which no entity ever uses as a key. The typed identifiers in this module
//! turn that `0` into `None` so callers cannot mistake it for a real key.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entity kinds that carry opaque identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Students, including student advisors.
    Student,
    /// Professors and administrative staff.
    Professor,
    /// Courses.
    Course,
    /// Enrollments.
    Enrollment,
    /// Departments.
    Department,
}

impl EntityKind {
    /// Prefix used in opaque identifiers.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Student => "STU",
            Self::Professor => "PROF",
            Self::Course => "CRS",
            Self::Enrollment => "ENR",
            Self::Department => "DEPT",
        }
    }

    /// Minimum number of digits after the prefix.
    pub const fn width(self) -> usize {
        match self {
            Self::Enrollment => 5,
            _ => 3,
        }
    }

    /// Lower-case label for logs and error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professor => "professor",
            Self::Course => "course",
            Self::Enrollment => "enrollment",
            Self::Department => "department",
        }
    }
}

/// Encode a relational key as an opaque identifier.
///
/// Keys wider than the padding keep all their digits, so ordering within a
/// kind is preserved for keys of equal width and the mapping stays lossless.
///
/// # Examples
/// ```
/// use registrar::domain::identifier::{EntityKind, encode};
///
/// assert_eq!(encode(7, EntityKind::Student), "STU007");
/// assert_eq!(encode(42, EntityKind::Enrollment), "ENR00042");
/// assert_eq!(encode(1234, EntityKind::Course), "CRS1234");
/// ```
pub fn encode(id: u64, kind: EntityKind) -> String {
    format!("{}{:0width$}", kind.prefix(), id, width = kind.width())
}

/// Decode an opaque or numeric identifier, returning `0` when unrecognised.
///
/// # Examples
/// ```
/// use registrar::domain::identifier::decode;
///
/// assert_eq!(decode("STU007"), 7);
/// assert_eq!(decode("15"), 15);
/// assert_eq!(decode("nonsense"), 0);
/// ```
pub fn decode(opaque: &str) -> u64 {
    let digits: String = opaque.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Errors raised when constructing a typed identifier from a raw key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The key was zero or negative.
    #[error("{kind} identifier must be positive, got {value}")]
    NotPositive {
        /// Entity kind label.
        kind: &'static str,
        /// Rejected value.
        value: i64,
    },
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            ToSchema,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Entity kind encoded by this identifier.
            pub const KIND: EntityKind = $kind;

            /// Validate a relational key.
            pub fn new(value: i64) -> Result<Self, IdentifierError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(IdentifierError::NotPositive {
                        kind: Self::KIND.label(),
                        value,
                    })
                }
            }

            /// Decode a numeric or opaque identifier; `None` when it names no entity.
            pub fn from_external(raw: &str) -> Option<Self> {
                i64::try_from(decode(raw)).ok().and_then(|value| Self::new(value).ok())
            }

            /// Relational key.
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Opaque identifier used by the document store.
            pub fn to_opaque(self) -> String {
                encode(self.0.unsigned_abs(), Self::KIND)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdentifierError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Student (or student advisor) key.
    StudentId => EntityKind::Student
);
numeric_id!(
    /// Professor (or administrator) key.
    ProfessorId => EntityKind::Professor
);
numeric_id!(
    /// Course key.
    CourseId => EntityKind::Course
);
numeric_id!(
    /// Enrollment key.
    EnrollmentId => EntityKind::Enrollment
);
numeric_id!(
    /// Department key.
    DepartmentId => EntityKind::Department
);
