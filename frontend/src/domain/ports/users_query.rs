//! Driving port for presentation-facing user queries.
//!
//! The presentation layer receives an implementation of this port and
//! nothing else: it never constructs or names a repository. Production backs
//! the port with [`crate::domain::UserDirectoryService`]; tests can use the
//! deterministic fixture below.

use async_trait::async_trait;

use crate::domain::{Error, User, WireUser};

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return the current users as presentation records, in source order.
    ///
    /// An empty `Ok` means the source holds no users; any failure to reach or
    /// read the source is an `Err`.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}

/// Fixture users query returning two well-known users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        const EPOCH: &str = "1970-01-01T00:00:00Z";

        // The fixture timestamps are constants; surface invalid data as an
        // internal error so automated checks catch accidental regressions.
        [
            WireUser::new(1, "Ada", "Lovelace", EPOCH, EPOCH),
            WireUser::new(2, "Grace", "Hopper", EPOCH, EPOCH),
        ]
        .into_iter()
        .map(|wire| {
            User::try_from(wire)
                .map_err(|err| Error::internal(format!("invalid fixture user: {err}")))
        })
        .collect()
    }
}
