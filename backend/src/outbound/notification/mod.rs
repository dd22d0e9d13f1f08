//! Enrollment confirmation adapters.
//!
//! [`HttpRelayNotifier`] posts the message to an HTTP mail relay;
//! [`LoggingNotifier`] only records it and is used when no relay is
//! configured.

mod http_relay;
mod logging;

pub use http_relay::{HttpRelayNotifier, RelayIdentity};
pub use logging::LoggingNotifier;

/// Subject line of every confirmation.
pub const CONFIRMATION_SUBJECT: &str = "Enrollment Confirmation";

/// Plain-text confirmation body.
pub fn confirmation_text(student_name: &str, course_name: &str) -> String {
    format!("Hello {student_name},\n\nYou have successfully enrolled in {course_name}.")
}
