//! Login against whichever store is active.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AuthenticatedUser, EnrollmentStoreError, LoginService, PasswordVerifier,
};
use crate::domain::{Error, LoginCredentials, StoreRouter};

/// Service implementing [`LoginService`] over the routed stores.
#[derive(Clone)]
pub struct StoreLoginService {
    stores: StoreRouter,
    verifier: Arc<dyn PasswordVerifier>,
}

impl StoreLoginService {
    /// Create the service.
    pub fn new(stores: StoreRouter, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self { stores, verifier }
    }

    fn map_store_error(error: EnrollmentStoreError) -> Error {
        match error {
            EnrollmentStoreError::Connection { message } => {
                Error::service_unavailable(format!("account store unavailable: {message}"))
            }
            other => Error::internal(format!("account lookup failed: {other}")),
        }
    }
}

#[async_trait]
impl LoginService for StoreLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        let (backend, store) = self.stores.active();
        let account = store
            .find_user_by_email(credentials.email())
            .await
            .map_err(Self::map_store_error)?;
        // Unknown email and wrong password are indistinguishable to callers.
        let Some(account) = account.filter(|account| {
            self.verifier
                .verify(credentials.password(), &account.password)
        }) else {
            debug!(backend = %backend, "login rejected");
            return Err(Error::unauthorized("invalid credentials"));
        };
        Ok(AuthenticatedUser {
            id: account.id,
            name: account.name,
            role: account.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockEnrollmentStore, PlaintextPasswordVerifier};
    use crate::domain::{
        BackendSelector, ErrorCode, Role, StorageBackend, StoredPassword, StudentId, UserAccount,
        UserRef,
    };
    use rstest::rstest;

    fn account() -> UserAccount {
        UserAccount {
            id: UserRef::Student(StudentId::new(1).expect("positive")),
            name: "Test Student".to_owned(),
            email: "test@student.com".to_owned(),
            role: Role::Student,
            password: StoredPassword::new("password123"),
        }
    }

    fn service(document: MockEnrollmentStore) -> StoreLoginService {
        let stores = StoreRouter::new(
            Arc::new(BackendSelector::new(StorageBackend::Document)),
            Arc::new(MockEnrollmentStore::new()),
            Arc::new(document),
        );
        StoreLoginService::new(stores, Arc::new(PlaintextPasswordVerifier))
    }

    #[tokio::test]
    async fn authenticates_through_active_store() {
        let mut store = MockEnrollmentStore::new();
        store
            .expect_find_user_by_email()
            .withf(|email| email == "test@student.com")
            .times(1)
            .returning(|_| Ok(Some(account())));
        let creds =
            LoginCredentials::try_from_parts("Test@Student.com", "password123").expect("shape");

        let user = service(store).authenticate(&creds).await.expect("login");

        assert_eq!(user.role, Role::Student);
        assert_eq!(user.id, account().id);
    }

    #[rstest]
    #[case(Some(account()), "wrong")]
    #[case(None, "password123")]
    #[tokio::test]
    async fn rejects_unknown_accounts_and_bad_passwords(
        #[case] found: Option<UserAccount>,
        #[case] password: &str,
    ) {
        let mut store = MockEnrollmentStore::new();
        store
            .expect_find_user_by_email()
            .return_once(move |_| Ok(found));
        let creds = LoginCredentials::try_from_parts("test@student.com", password).expect("shape");

        let err = service(store)
            .authenticate(&creds)
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
