//! Driven port for fetching raw user records from a data source.
//!
//! Adapters return records exactly as the source serialised them. Each call
//! is one independent read: no caching, no retry, no coalescing of
//! concurrent calls.

use async_trait::async_trait;

use crate::domain::WireUser;

use super::define_port_error;

define_port_error! {
    /// Failures raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The request never completed (connection refused, timeout, reset).
        Network { message: String } =>
            "user source unreachable: {message}",
        /// The source answered with a status outside `200..300`.
        Transport { status: u16, status_text: String } =>
            "user source responded with {status}: {status_text}",
        /// The payload did not decode as a sequence of wire users.
        Decode { message: String } =>
            "user payload decode failed: {message}",
    }
}

/// Port for fetching the current collection of users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch every user currently held by the source, in source order.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontend::domain::WireUser;
    /// use frontend::domain::ports::{FixtureUserRepository, UserRepository};
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// let repository = FixtureUserRepository::new(vec![WireUser::new(
    ///     1,
    ///     "Ada",
    ///     "Lovelace",
    ///     "1970-01-01T00:00:00Z",
    ///     "1970-01-01T00:00:00Z",
    /// )]);
    /// let users = repository.fetch_users().await?;
    /// assert_eq!(users.len(), 1);
    /// # Ok::<(), frontend::domain::ports::UserRepositoryError>(())
    /// # }).unwrap();
    /// ```
    async fn fetch_users(&self) -> Result<Vec<WireUser>, UserRepositoryError>;
}

/// In-memory repository returning a fixed collection on every call.
#[derive(Debug, Clone, Default)]
pub struct FixtureUserRepository {
    users: Vec<WireUser>,
}

impl FixtureUserRepository {
    pub fn new(users: Vec<WireUser>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn fetch_users(&self) -> Result<Vec<WireUser>, UserRepositoryError> {
        Ok(self.users.clone())
    }
}
