//! UserRepository trait definition.

use chatrelay_types::error::StoreError;
use chatrelay_types::user::User;
use chrono::{DateTime, Utc};

/// Repository trait for user persistence.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with [`StoreError::DuplicateKey`] when the email
    /// is already registered.
    fn create_user(&self, user: &User) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Look a user up by exact email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, StoreError>> + Send;

    fn record_login(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
