//! Course entity and seat-counter arithmetic.

use serde::Serialize;
use utoipa::ToSchema;

use super::identifier::{CourseId, ProfessorId};

/// Validation errors raised when assembling a [`Course`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseValidationError {
    /// Course name was blank.
    #[error("course name must not be empty")]
    EmptyName,
    /// Credits must be positive.
    #[error("course credits must be positive, got {0}")]
    NonPositiveCredits(i32),
    /// Seat counters violate `0 <= seats_available <= total_seats`.
    #[error("seats available {available} outside 0..={total}")]
    SeatsOutOfRange {
        /// Remaining seats.
        available: i32,
        /// Seat capacity.
        total: i32,
    },
}

/// Input for [`Course::try_new`].
#[derive(Debug, Clone)]
pub struct CourseDraft {
    /// Course key.
    pub id: CourseId,
    /// Course name.
    pub name: String,
    /// Credit value.
    pub credits: i32,
    /// Seat capacity fixed at creation.
    pub total_seats: i32,
    /// Remaining seats.
    pub seats_available: i32,
    /// Owning professor, if assigned.
    pub professor_id: Option<ProfessorId>,
}

/// A course with its seat counters.
///
/// ## Invariants
/// - `credits > 0`.
/// - `0 <= seats_available <= total_seats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: CourseId,
    name: String,
    credits: i32,
    total_seats: i32,
    seats_available: i32,
    professor_id: Option<ProfessorId>,
}

impl Course {
    /// Validate a draft into a course.
    pub fn try_new(draft: CourseDraft) -> Result<Self, CourseValidationError> {
        let CourseDraft {
            id,
            name,
            credits,
            total_seats,
            seats_available,
            professor_id,
        } = draft;
        if name.trim().is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        if credits <= 0 {
            return Err(CourseValidationError::NonPositiveCredits(credits));
        }
        if seats_available < 0 || seats_available > total_seats {
            return Err(CourseValidationError::SeatsOutOfRange {
                available: seats_available,
                total: total_seats,
            });
        }
        Ok(Self {
            id,
            name,
            credits,
            total_seats,
            seats_available,
            professor_id,
        })
    }

    /// Course key.
    pub const fn id(&self) -> CourseId {
        self.id
    }

    /// Course name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Credit value.
    pub const fn credits(&self) -> i32 {
        self.credits
    }

    /// Seat capacity.
    pub const fn total_seats(&self) -> i32 {
        self.total_seats
    }

    /// Remaining seats.
    pub const fn seats_available(&self) -> i32 {
        self.seats_available
    }

    /// Owning professor.
    pub const fn professor_id(&self) -> Option<ProfessorId> {
        self.professor_id
    }

    /// Whether another student can enroll given the current enrollment count.
    ///
    /// Enrollment is refused once the count reaches the seat counter. The
    /// counter itself drops by one per enrollment, so a course stops
    /// admitting at half of `total_seats`, rounded up.
    ///
    /// # Examples
    /// ```
    /// use registrar::domain::{Course, CourseDraft, CourseId};
    ///
    /// let course = Course::try_new(CourseDraft {
    ///     id: CourseId::new(1).unwrap(),
    ///     name: "Algorithms".to_owned(),
    ///     credits: 4,
    ///     total_seats: 4,
    ///     seats_available: 2,
    ///     professor_id: None,
    /// })
    /// .unwrap();
    /// assert!(course.has_capacity(1));
    /// assert!(!course.has_capacity(2));
    /// ```
    pub fn has_capacity(&self, enrolled: i64) -> bool {
        enrolled < i64::from(self.seats_available)
    }

    /// Seat counter after one enrollment, floored at zero.
    pub fn decremented_seats(&self) -> i32 {
        decrement_seats(self.seats_available)
    }

    /// Seat counter after one drop, capped at capacity.
    pub fn incremented_seats(&self) -> i32 {
        increment_seats(self.seats_available, self.total_seats)
    }
}

/// Floor-clamped decrement shared by both storage adapters.
pub fn decrement_seats(seats_available: i32) -> i32 {
    seats_available.saturating_sub(1).max(0)
}

/// Capacity-capped increment shared by both storage adapters.
pub fn increment_seats(seats_available: i32, total_seats: i32) -> i32 {
    seats_available.saturating_add(1).min(total_seats)
}
