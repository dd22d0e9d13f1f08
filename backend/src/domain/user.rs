//! University accounts: students, advisors, professors and staff.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::identifier::{ProfessorId, StudentId};

/// Account role, shared by both storage backends.
///
/// The relational store keys roles by `1..=4` in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular student.
    Student,
    /// Student who advises other students.
    StudentAdvisor,
    /// Teaching staff.
    Professor,
    /// Administrative staff with access to maintenance operations.
    AdministrativeStaff,
}

/// Error returned when parsing an unknown role name or id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Relational role key.
    pub const fn id(self) -> i32 {
        match self {
            Self::Student => 1,
            Self::StudentAdvisor => 2,
            Self::Professor => 3,
            Self::AdministrativeStaff => 4,
        }
    }

    /// Resolve a relational role key.
    pub fn from_id(id: i32) -> Result<Self, UnknownRole> {
        match id {
            1 => Ok(Self::Student),
            2 => Ok(Self::StudentAdvisor),
            3 => Ok(Self::Professor),
            4 => Ok(Self::AdministrativeStaff),
            other => Err(UnknownRole(other.to_string())),
        }
    }

    /// Wire name, as stored in documents and headers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::StudentAdvisor => "student_advisor",
            Self::Professor => "professor",
            Self::AdministrativeStaff => "administrative_staff",
        }
    }

    /// Whether the role belongs to the student table.
    pub const fn is_student(self) -> bool {
        matches!(self, Self::Student | Self::StudentAdvisor)
    }

    /// Whether the role may record grades.
    pub const fn can_grade(self) -> bool {
        matches!(self, Self::Professor | Self::AdministrativeStaff)
    }

    /// Whether the role may run maintenance operations.
    pub const fn is_administrative(self) -> bool {
        matches!(self, Self::AdministrativeStaff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "student" => Ok(Self::Student),
            "student_advisor" => Ok(Self::StudentAdvisor),
            "professor" => Ok(Self::Professor),
            "administrative_staff" => Ok(Self::AdministrativeStaff),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Reference to an account in either the student or professor namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRef {
    /// Row in the student table.
    Student(StudentId),
    /// Row in the professor table (also covers administrators).
    Professor(ProfessorId),
}

impl UserRef {
    /// Relational key of the referenced account.
    pub const fn key(self) -> i64 {
        match self {
            Self::Student(id) => id.get(),
            Self::Professor(id) => id.get(),
        }
    }

    /// Opaque document identifier of the referenced account.
    pub fn to_opaque(self) -> String {
        match self {
            Self::Student(id) => id.to_opaque(),
            Self::Professor(id) => id.to_opaque(),
        }
    }
}

/// Stored credential value.
///
/// Accounts currently hold plaintext values; the [`PasswordVerifier`] port
/// decides how a candidate is compared.
///
/// [`PasswordVerifier`]: crate::domain::ports::PasswordVerifier
#[derive(Clone, PartialEq, Eq)]
pub struct StoredPassword(Zeroizing<String>);

impl StoredPassword {
    /// Wrap a stored credential.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Raw stored value.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredPassword(<redacted>)")
    }
}

/// Account resolved by email for authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Account reference.
    pub id: UserRef,
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Stored credential.
    pub password: StoredPassword,
}

/// Student details needed to address an enrollment confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    /// Student key.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Student, 1, "student")]
    #[case(Role::StudentAdvisor, 2, "student_advisor")]
    #[case(Role::Professor, 3, "professor")]
    #[case(Role::AdministrativeStaff, 4, "administrative_staff")]
    fn roles_map_to_keys_and_names(#[case] role: Role, #[case] id: i32, #[case] name: &str) {
        assert_eq!(role.id(), id);
        assert_eq!(Role::from_id(id), Ok(role));
        assert_eq!(role.as_str(), name);
        assert_eq!(name.parse::<Role>(), Ok(role));
        assert_eq!(
            serde_json::to_value(role).expect("serialise"),
            serde_json::json!(name)
        );
    }

    #[rstest]
    #[case("dean")]
    #[case("")]
    fn unknown_role_names_are_rejected(#[case] raw: &str) {
        assert!(raw.parse::<Role>().is_err());
    }

    #[test]
    fn unknown_role_ids_are_rejected() {
        assert_eq!(Role::from_id(9), Err(UnknownRole("9".to_owned())));
    }

    #[rstest]
    #[case(Role::Student, false, false)]
    #[case(Role::StudentAdvisor, false, false)]
    #[case(Role::Professor, true, false)]
    #[case(Role::AdministrativeStaff, true, true)]
    fn permissions_follow_role(
        #[case] role: Role,
        #[case] can_grade: bool,
        #[case] administrative: bool,
    ) {
        assert_eq!(role.can_grade(), can_grade);
        assert_eq!(role.is_administrative(), administrative);
    }

    #[test]
    fn stored_password_debug_is_redacted() {
        let password = StoredPassword::new("hunter2");
        assert!(!format!("{password:?}").contains("hunter2"));
        assert_eq!(password.expose(), "hunter2");
    }

    #[test]
    fn user_ref_renders_opaque_ids_per_namespace() {
        let student = UserRef::Student(StudentId::new(7).expect("positive"));
        let professor = UserRef::Professor(ProfessorId::new(7).expect("positive"));
        assert_eq!(student.to_opaque(), "STU007");
        assert_eq!(professor.to_opaque(), "PROF007");
        assert_eq!(student.key(), professor.key());
    }
}
