//! Driving port for features that only need a subset of user fields.

use async_trait::async_trait;

use crate::domain::{Error, FieldSelection, UserProjection};

/// Domain use-case port returning users trimmed to a field selection.
#[async_trait]
pub trait UserSummariesQuery: Send + Sync {
    /// Return one projection per user, in source order, holding only the
    /// fields named by `selection`.
    async fn list_user_summaries(
        &self,
        selection: &FieldSelection,
    ) -> Result<Vec<UserProjection>, Error>;
}
