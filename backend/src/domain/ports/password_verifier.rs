//! Port comparing a login candidate with a stored credential.
//!
//! Accounts currently store plaintext values. Keeping the comparison behind
//! this port lets a hashing scheme replace it without touching the services.

use crate::domain::StoredPassword;

/// Credential comparison predicate.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    /// Whether `candidate` matches `stored`.
    fn verify(&self, candidate: &str, stored: &StoredPassword) -> bool;
}

/// Byte-for-byte comparison against a plaintext stored value.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPasswordVerifier;

impl PasswordVerifier for PlaintextPasswordVerifier {
    fn verify(&self, candidate: &str, stored: &StoredPassword) -> bool {
        let expected = stored.expose().as_bytes();
        let given = candidate.as_bytes();
        // Length mismatch short-circuits; equal lengths compare every byte.
        expected.len() == given.len()
            && expected
                .iter()
                .zip(given)
                .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
                == 0
    }
}
