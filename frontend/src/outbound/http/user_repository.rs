//! HTTP-backed user repository adapter.
//!
//! This adapter owns transport details only: issuing one read against the
//! bound endpoint, classifying the status, and decoding the JSON body into
//! wire records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use super::transport::{ReadTransport, ReqwestTransport, TransportResponse};
use crate::domain::WireUser;
use crate::domain::ports::{UserRepository, UserRepositoryError};

/// Statuses in this range count as success; everything else is a failure.
const SUCCESS_STATUSES: std::ops::Range<u16> = 200..300;

/// User repository reading one fixed endpoint through a [`ReadTransport`].
#[derive(Debug, Clone)]
pub struct HttpUserRepository<T> {
    transport: T,
    endpoint: Url,
}

impl<T> HttpUserRepository<T> {
    /// Bind a repository to `endpoint` over the given transport.
    pub fn new(transport: T, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Endpoint every fetch reads from.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl HttpUserRepository<ReqwestTransport> {
    /// Build a repository over a reqwest client with an explicit timeout.
    /// ```rust,ignore
    /// let repository = HttpUserRepository::over_reqwest(endpoint, timeout)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn over_reqwest(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(ReqwestTransport::new(timeout)?, endpoint))
    }
}

#[async_trait]
impl<T> UserRepository for HttpUserRepository<T>
where
    T: ReadTransport,
{
    async fn fetch_users(&self) -> Result<Vec<WireUser>, UserRepositoryError> {
        debug!(url = %self.endpoint, "fetching users");
        let response = self
            .transport
            .get_json(&self.endpoint)
            .await
            .map_err(|failure| {
                warn!(url = %self.endpoint, timed_out = failure.is_timeout(), error = %failure, "user source unreachable");
                UserRepositoryError::network(failure.to_string())
            })?;

        ensure_success(&response)?;
        let users = decode_users(&response.body)?;
        debug!(url = %self.endpoint, count = users.len(), "fetched users");
        Ok(users)
    }
}

fn ensure_success(response: &TransportResponse) -> Result<(), UserRepositoryError> {
    if SUCCESS_STATUSES.contains(&response.status) {
        return Ok(());
    }

    warn!(
        status = response.status,
        body = %body_preview(&response.body),
        "user source rejected request"
    );
    Err(UserRepositoryError::transport(
        response.status,
        response.status_text.as_str(),
    ))
}

fn decode_users(body: &[u8]) -> Result<Vec<WireUser>, UserRepositoryError> {
    serde_json::from_slice(body).map_err(|error| {
        UserRepositoryError::decode(format!("invalid users JSON payload: {error}"))
    })
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
