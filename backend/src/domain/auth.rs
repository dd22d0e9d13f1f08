//! Login credentials as accepted by the account lookup.
//!
//! Emails are the only account key shared by students and professors, so the
//! address is normalised here once and every store compares the same form.

use zeroize::Zeroizing;

/// Reasons a login payload is rejected before any store is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacks a local part or a domain.
    #[error("email must look like local@domain")]
    MalformedEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Name of the offending payload field.
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::MalformedEmail => "email",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::MalformedEmail => "malformed_email",
            Self::EmptyPassword => "empty_password",
        }
    }
}

/// Email and password pair ready for [`crate::domain::ports::LoginService`].
///
/// The email is trimmed and lower-cased. The password is kept exactly as
/// given and wiped from memory on drop.
///
/// # Examples
/// ```
/// use registrar::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Test@Student.com ", "password123").unwrap();
/// assert_eq!(creds.email(), "test@student.com");
/// assert_eq!(creds.password(), "password123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

fn normalise_email(raw: &str) -> Result<String, LoginValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LoginValidationError::EmptyEmail);
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(trimmed.to_lowercase())
        }
        _ => Err(LoginValidationError::MalformedEmail),
    }
}

impl LoginCredentials {
    /// Validate raw payload fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Lookup key for the account.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("student.com", "pw", LoginValidationError::MalformedEmail)]
    #[case("@student.com", "pw", LoginValidationError::MalformedEmail)]
    #[case("a@b@c", "pw", LoginValidationError::MalformedEmail)]
    #[case("user@example.com", "", LoginValidationError::EmptyPassword)]
    fn rejects_unusable_payloads(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin@university.com  ", "admin123", "admin@university.com")]
    #[case("Alice@Example.COM", " spaced pass ", "alice@example.com")]
    fn lower_cases_the_email_but_not_the_password(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected_email: &str,
    ) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), expected_email);
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn errors_name_their_field() {
        assert_eq!(LoginValidationError::MalformedEmail.field(), "email");
        assert_eq!(LoginValidationError::EmptyPassword.code(), "empty_password");
    }
}
