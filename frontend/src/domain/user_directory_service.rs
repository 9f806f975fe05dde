//! User directory service.
//!
//! The service composes a [`UserRepository`] supplied at construction and
//! implements the presentation-facing driving ports. It never builds its own
//! data source, so tests substitute a double for the repository.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    UserRepository, UserRepositoryError, UserSummariesQuery, UsersQuery,
};
use crate::domain::{
    Error, FieldSelection, User, UserConversionError, UserProjection, WireUser, normalize_user,
};

/// Service turning repository records into presentation records.
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    repository: Arc<R>,
}

impl<R> UserDirectoryService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> UserDirectoryService<R>
where
    R: UserRepository,
{
    fn map_repository_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Network { message } => {
                Error::network(format!("user directory unreachable: {message}"))
            }
            UserRepositoryError::Transport {
                status,
                status_text,
            } => Error::transport(format!(
                "user directory request failed: {status} {status_text}"
            ))
            .with_details(json!({
                "status": status,
                "statusText": status_text,
            })),
            UserRepositoryError::Decode { message } => {
                Error::decode(format!("user directory payload invalid: {message}"))
            }
        }
    }

    fn map_conversion_error(error: UserConversionError) -> Error {
        Error::decode(format!("user directory record invalid: {error}")).with_details(json!({
            "userId": error.user_id(),
            "field": error.field(),
        }))
    }

    async fn fetch_wire_users(&self) -> Result<Vec<WireUser>, Error> {
        self.repository.fetch_users().await.map_err(|error| {
            let mapped = Self::map_repository_error(error);
            warn!(code = %mapped.code(), error = %mapped, "user repository fetch failed");
            mapped
        })
    }

    /// Convert every record or none: a single bad record fails the batch.
    fn present(records: Vec<WireUser>) -> Result<Vec<User>, Error> {
        records
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| {
                let mapped = Self::map_conversion_error(error);
                warn!(code = %mapped.code(), error = %mapped, "user record conversion failed");
                mapped
            })
    }
}

#[async_trait]
impl<R> UsersQuery for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let records = self.fetch_wire_users().await?;
        let users = Self::present(records)?;
        debug!(count = users.len(), "user directory listed users");
        Ok(users)
    }
}

#[async_trait]
impl<R> UserSummariesQuery for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn list_user_summaries(
        &self,
        selection: &FieldSelection,
    ) -> Result<Vec<UserProjection>, Error> {
        let records = self.fetch_wire_users().await?;
        Ok(records
            .iter()
            .map(|record| normalize_user(record, selection))
            .collect())
    }
}
