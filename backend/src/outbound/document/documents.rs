//! Denormalised document shapes stored in the collections.
//!
//! Field names are camelCase JSON. User documents embed a summary of every
//! enrolled course plus a credit total; course documents embed an
//! enrollment counter and a bounded log of the latest enrollments. Every
//! mutation in the store keeps these caches in step with the enrollment
//! documents.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Course, CourseDraft, CourseId, EnrollmentId, EnrollmentRecord, Grade, ProfessorId, Role,
    StudentId,
};

use super::collections::DocumentStoreError;

/// Maximum number of entries kept in a course's recent-enrollment log.
pub const RECENT_ENROLLMENTS_CAP: usize = 10;

/// Encode a document as JSON.
pub(crate) fn encode<T: Serialize>(document: &T) -> Result<String, DocumentStoreError> {
    serde_json::to_string(document).map_err(|err| DocumentStoreError::codec(err.to_string()))
}

/// Decode a JSON document.
pub(crate) fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, DocumentStoreError> {
    serde_json::from_str(raw).map_err(|err| DocumentStoreError::codec(err.to_string()))
}

/// Unique key of a (student, course) pair in the pair index.
pub(crate) fn pair_key(student_id: StudentId, course_id: CourseId) -> String {
    format!("{}:{}", student_id.to_opaque(), course_id.to_opaque())
}

/// Summary of one enrollment embedded in the student's user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub enrollment_id: String,
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
    pub grade: Option<Grade>,
    pub enrolled_at: DateTime<Utc>,
}

/// Student, professor or administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub advisor_id: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<EnrolledCourse>,
    #[serde(default)]
    pub total_credits: i64,
}

impl UserDocument {
    /// Add an enrolled-course summary and its credits.
    pub fn push_course(&mut self, entry: EnrolledCourse) {
        self.total_credits = self.total_credits.saturating_add(i64::from(entry.credits));
        self.enrolled_courses.push(entry);
    }

    /// Remove the summary for `enrollment_id`, giving its credits back.
    /// Returns whether an entry was removed.
    pub fn remove_course(&mut self, enrollment_id: &str) -> bool {
        let Some(position) = self
            .enrolled_courses
            .iter()
            .position(|entry| entry.enrollment_id == enrollment_id)
        else {
            return false;
        };
        let removed = self.enrolled_courses.remove(position);
        self.total_credits = self
            .total_credits
            .saturating_sub(i64::from(removed.credits))
            .max(0);
        true
    }

    /// Mirror a grade into the summary for `enrollment_id`.
    pub fn set_grade(&mut self, enrollment_id: &str, grade: Option<Grade>) -> bool {
        match self
            .enrolled_courses
            .iter_mut()
            .find(|entry| entry.enrollment_id == enrollment_id)
        {
            Some(entry) => {
                entry.grade = grade;
                true
            }
            None => false,
        }
    }
}

/// Entry of a course's recent-enrollment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEnrollment {
    pub enrollment_id: String,
    pub student_id: String,
    pub student_name: String,
    pub enrolled_at: DateTime<Utc>,
}

/// Course with its seat counters and caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    pub course_id: String,
    pub name: String,
    pub credits: i32,
    pub total_seats: i32,
    pub seats_available: i32,
    #[serde(default)]
    pub enrollment_count: i64,
    #[serde(default)]
    pub professor_id: Option<String>,
    #[serde(default)]
    pub recent_enrollments: Vec<RecentEnrollment>,
}

impl CourseDocument {
    /// Build a document from a domain course with empty caches.
    pub fn from_course(course: &Course) -> Self {
        Self {
            course_id: course.id().to_opaque(),
            name: course.name().to_owned(),
            credits: course.credits(),
            total_seats: course.total_seats(),
            seats_available: course.seats_available(),
            enrollment_count: 0,
            professor_id: course.professor_id().map(ProfessorId::to_opaque),
            recent_enrollments: Vec::new(),
        }
    }

    /// Convert into the domain course, validating the seat counters.
    pub fn to_course(&self) -> Result<Course, DocumentStoreError> {
        let id = CourseId::from_external(&self.course_id).ok_or_else(|| {
            DocumentStoreError::codec(format!("malformed course id {:?}", self.course_id))
        })?;
        Course::try_new(CourseDraft {
            id,
            name: self.name.clone(),
            credits: self.credits,
            total_seats: self.total_seats,
            seats_available: self.seats_available,
            professor_id: self
                .professor_id
                .as_deref()
                .and_then(ProfessorId::from_external),
        })
        .map_err(|err| DocumentStoreError::codec(format!("course {}: {err}", self.course_id)))
    }

    /// Append to the recent-enrollment log, evicting the oldest entries
    /// beyond [`RECENT_ENROLLMENTS_CAP`].
    pub fn record_recent(&mut self, entry: RecentEnrollment) {
        self.recent_enrollments.push(entry);
        let overflow = self
            .recent_enrollments
            .len()
            .saturating_sub(RECENT_ENROLLMENTS_CAP);
        if overflow > 0 {
            self.recent_enrollments.drain(..overflow);
        }
    }

    /// Drop `enrollment_id` from the recent-enrollment log if present.
    pub fn forget_recent(&mut self, enrollment_id: &str) {
        self.recent_enrollments
            .retain(|entry| entry.enrollment_id != enrollment_id);
    }
}

/// Authoritative enrollment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDocument {
    pub enrollment_id: String,
    pub student_id: String,
    pub course_id: String,
    pub grade: Option<Grade>,
    pub enrolled_at: DateTime<Utc>,
}

impl EnrollmentDocument {
    /// Build a document from a domain record.
    pub fn from_record(record: &EnrollmentRecord) -> Self {
        Self {
            enrollment_id: record.id.to_opaque(),
            student_id: record.student_id.to_opaque(),
            course_id: record.course_id.to_opaque(),
            grade: record.grade,
            enrolled_at: record.enrolled_at,
        }
    }

    /// Convert into the domain record.
    pub fn to_record(&self) -> Result<EnrollmentRecord, DocumentStoreError> {
        let malformed =
            |field: &str, value: &str| DocumentStoreError::codec(format!("malformed {field} {value:?}"));
        Ok(EnrollmentRecord {
            id: EnrollmentId::from_external(&self.enrollment_id)
                .ok_or_else(|| malformed("enrollment id", &self.enrollment_id))?,
            student_id: StudentId::from_external(&self.student_id)
                .ok_or_else(|| malformed("student id", &self.student_id))?,
            course_id: CourseId::from_external(&self.course_id)
                .ok_or_else(|| malformed("course id", &self.course_id))?,
            grade: self.grade,
            enrolled_at: self.enrolled_at,
        })
    }
}

/// Department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDocument {
    pub department_id: String,
    pub name: String,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn recent(n: usize) -> RecentEnrollment {
        RecentEnrollment {
            enrollment_id: format!("ENR{n:05}"),
            student_id: "STU001".to_owned(),
            student_name: "Test Student".to_owned(),
            enrolled_at: Utc::now(),
        }
    }

    fn course_document() -> CourseDocument {
        CourseDocument {
            course_id: "CRS007".to_owned(),
            name: "Compilers".to_owned(),
            credits: 5,
            total_seats: 30,
            seats_available: 30,
            enrollment_count: 0,
            professor_id: Some("PROF002".to_owned()),
            recent_enrollments: Vec::new(),
        }
    }

    #[rstest]
    fn recent_log_keeps_the_latest_ten() {
        let mut course = course_document();
        for n in 1..=12 {
            course.record_recent(recent(n));
        }

        assert_eq!(course.recent_enrollments.len(), RECENT_ENROLLMENTS_CAP);
        assert_eq!(
            course.recent_enrollments.first().map(|e| e.enrollment_id.as_str()),
            Some("ENR00003")
        );
        assert_eq!(
            course.recent_enrollments.last().map(|e| e.enrollment_id.as_str()),
            Some("ENR00012")
        );
    }

    #[rstest]
    fn course_documents_round_trip_through_the_domain() {
        let document = course_document();
        let course = document.to_course().expect("valid document");
        assert_eq!(course.id().get(), 7);
        assert_eq!(course.professor_id().map(ProfessorId::get), Some(2));
        assert_eq!(CourseDocument::from_course(&course), document);
    }

    #[rstest]
    fn course_documents_serialise_camel_case() {
        let json = encode(&course_document()).expect("encode");
        assert!(json.contains("\"seatsAvailable\":30"));
        assert!(json.contains("\"recentEnrollments\":[]"));
    }

    #[rstest]
    fn user_course_list_tracks_credits() {
        let mut user = UserDocument {
            user_id: "STU001".to_owned(),
            name: "Test Student".to_owned(),
            email: "test@student.com".to_owned(),
            password: "password123".to_owned(),
            role: Role::Student,
            advisor_id: None,
            departments: vec![],
            enrolled_courses: vec![],
            total_credits: 0,
        };
        user.push_course(EnrolledCourse {
            enrollment_id: "ENR00001".to_owned(),
            course_id: "CRS007".to_owned(),
            course_name: "Compilers".to_owned(),
            credits: 5,
            grade: None,
            enrolled_at: Utc::now(),
        });
        assert_eq!(user.total_credits, 5);
        assert!(user.set_grade("ENR00001", Some(Grade::A)));
        assert_eq!(user.enrolled_courses[0].grade, Some(Grade::A));

        assert!(user.remove_course("ENR00001"));
        assert!(!user.remove_course("ENR00001"));
        assert_eq!(user.total_credits, 0);
    }

    #[rstest]
    fn malformed_ids_are_codec_errors() {
        let document = EnrollmentDocument {
            enrollment_id: "ENR-".to_owned(),
            student_id: "STU001".to_owned(),
            course_id: "CRS001".to_owned(),
            grade: None,
            enrolled_at: Utc::now(),
        };
        assert!(matches!(
            document.to_record(),
            Err(DocumentStoreError::Codec { .. })
        ));
    }

    #[rstest]
    fn pair_keys_use_opaque_ids() {
        let key = pair_key(
            StudentId::new(1).expect("positive"),
            CourseId::new(12).expect("positive"),
        );
        assert_eq!(key, "STU001:CRS012");
    }
}
