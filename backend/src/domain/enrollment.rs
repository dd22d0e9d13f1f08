//! Enrollment records and letter grades.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::{CourseId, EnrollmentId, StudentId};

/// Letter grade recorded against an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    /// Excellent.
    A,
    /// Good.
    B,
    /// Satisfactory.
    C,
    /// Sufficient.
    D,
    /// Failed.
    F,
}

/// Error returned when parsing a grade outside `A`..`F`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("grade must be one of A, B, C, D or F, got {0:?}")]
pub struct InvalidGrade(pub String);

impl Grade {
    /// Letter as stored by both backends.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = InvalidGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "F" => Ok(Self::F),
            other => Err(InvalidGrade(other.to_owned())),
        }
    }
}

/// A student's enrollment in a course.
///
/// `grade` is `None` until a grade is recorded; recording `None` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    /// Enrollment key.
    pub id: EnrollmentId,
    /// Enrolled student.
    pub student_id: StudentId,
    /// Course enrolled in.
    pub course_id: CourseId,
    /// Recorded grade, if any.
    pub grade: Option<Grade>,
    /// Creation time.
    pub enrolled_at: DateTime<Utc>,
}
