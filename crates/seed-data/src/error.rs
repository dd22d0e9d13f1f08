//! Error types for the seed-data crate.

use thiserror::Error;

/// Errors raised while validating a plan or generating a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The plan requests no departments.
    #[error("dataset plan requires at least one department")]
    NoDepartments,

    /// The plan requests more departments than the fixed catalogue holds.
    #[error("dataset plan requests {requested} departments but only {available} are defined")]
    TooManyDepartments {
        /// Departments requested.
        requested: usize,
        /// Departments available.
        available: usize,
    },

    /// The plan requests no professors.
    #[error("dataset plan requires at least one professor")]
    NoProfessors,

    /// The plan cannot hold both the test student and an advisor.
    #[error("dataset plan requires at least two students, got {requested}")]
    TooFewStudents {
        /// Students requested.
        requested: usize,
    },

    /// The plan requests no courses.
    #[error("dataset plan requires at least one course")]
    NoCourses,

    /// A count does not fit the relational key range.
    #[error("{entity} count {count} exceeds the supported identifier range")]
    IdentifierOverflow {
        /// Entity kind being numbered.
        entity: &'static str,
        /// Offending count.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_departments_formats_correctly() {
        let err = GenerationError::TooManyDepartments {
            requested: 12,
            available: 8,
        };
        assert_eq!(
            err.to_string(),
            "dataset plan requests 12 departments but only 8 are defined"
        );
    }

    #[test]
    fn identifier_overflow_formats_correctly() {
        let err = GenerationError::IdentifierOverflow {
            entity: "student",
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "student count 3 exceeds the supported identifier range"
        );
    }
}
