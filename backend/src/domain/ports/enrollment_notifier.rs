//! Port for delivering enrollment confirmations.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotificationError {
        /// The relay could not be reached.
        Transport { message: String } =>
            "notification transport failed: {message}",
        /// The relay refused the message.
        Rejected { status: u16, message: String } =>
            "notification rejected with status {status}: {message}",
    }
}

/// Sends a confirmation once an enrollment has been committed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentNotifier: Send + Sync {
    /// Tell `to` that they are enrolled in `course_name`.
    async fn send_enrollment_confirmation(
        &self,
        to: &str,
        student_name: &str,
        course_name: &str,
    ) -> Result<(), NotificationError>;
}

/// Notifier that accepts every message and sends nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentNotifier;

#[async_trait]
impl EnrollmentNotifier for FixtureEnrollmentNotifier {
    async fn send_enrollment_confirmation(
        &self,
        _to: &str,
        _student_name: &str,
        _course_name: &str,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_includes_status() {
        let err = NotificationError::rejected(502_u16, "bad gateway");
        assert_eq!(
            err.to_string(),
            "notification rejected with status 502: bad gateway"
        );
    }

    #[tokio::test]
    async fn fixture_notifier_accepts_messages() {
        FixtureEnrollmentNotifier
            .send_enrollment_confirmation("a@b.c", "Ada", "Algorithms")
            .await
            .expect("fixture accepts");
    }
}
