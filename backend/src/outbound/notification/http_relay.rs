//! Reqwest-backed mail relay notifier.
//!
//! Owns transport details only: message rendering, request timeout and
//! mapping HTTP failures into [`NotificationError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{EnrollmentNotifier, NotificationError};

use super::{CONFIRMATION_SUBJECT, confirmation_text};

const DEFAULT_SENDER: &str = "\"University of Vienna\" <noreply@univienna.edu>";
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Sender identity placed in the `from` field.
#[derive(Debug, Clone)]
pub struct RelayIdentity {
    /// RFC 5322 mailbox, display name included.
    pub sender: String,
}

impl Default for RelayIdentity {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_owned(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
    html: String,
}

/// Notifier posting JSON messages to one relay endpoint.
pub struct HttpRelayNotifier {
    client: Client,
    endpoint: Url,
    identity: RelayIdentity,
}

impl HttpRelayNotifier {
    /// Build a notifier with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(endpoint, timeout, RelayIdentity::default())
    }

    /// Build a notifier with a custom sender.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        endpoint: Url,
        timeout: Duration,
        identity: RelayIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            identity,
        })
    }
}

fn render<'a>(
    sender: &'a str,
    to: &'a str,
    student_name: &str,
    course_name: &str,
) -> RelayMessage<'a> {
    RelayMessage {
        from: sender,
        to,
        subject: CONFIRMATION_SUBJECT,
        text: confirmation_text(student_name, course_name),
        html: format!(
            "<p>Hello {student_name},</p><p>You have successfully enrolled in \
             <strong>{course_name}</strong>.</p>"
        ),
    }
}

fn map_transport_error(error: reqwest::Error) -> NotificationError {
    let kind = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else {
        "transport"
    };
    NotificationError::transport(format!("{kind}: {error}"))
}

fn map_status_error(status: StatusCode, body: &str) -> NotificationError {
    let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    NotificationError::rejected(status.as_u16(), excerpt)
}

#[async_trait]
impl EnrollmentNotifier for HttpRelayNotifier {
    async fn send_enrollment_confirmation(
        &self,
        to: &str,
        student_name: &str,
        course_name: &str,
    ) -> Result<(), NotificationError> {
        let message = render(&self.identity.sender, to, student_name, course_name);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&message)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn messages_carry_the_confirmation_text() {
        let message = render(DEFAULT_SENDER, "ada@student.com", "Ada", "Compilers");

        assert_eq!(message.subject, "Enrollment Confirmation");
        assert_eq!(
            message.text,
            "Hello Ada,\n\nYou have successfully enrolled in Compilers."
        );
        assert!(message.html.contains("<strong>Compilers</strong>"));
        let json = serde_json::to_value(&message).expect("serialise");
        assert_eq!(json["from"], DEFAULT_SENDER);
        assert_eq!(json["to"], "ada@student.com");
    }

    #[rstest]
    fn status_errors_keep_a_bounded_body_excerpt() {
        let body = "x".repeat(1_000);
        let err = map_status_error(StatusCode::BAD_GATEWAY, &body);

        match err {
            NotificationError::Rejected { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
