//! Read-only HTTP transport capability.
//!
//! Repositories depend on [`ReadTransport`] alone: "perform a read, get back
//! a status and a body". [`ReqwestTransport`] is the production
//! implementation; tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Completed response as seen by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric HTTP status code.
    pub status: u16,
    /// Human-readable description of the status.
    pub status_text: String,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// The request never produced a complete response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    message: String,
    timed_out: bool,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    /// Whether the request was abandoned because it ran out of time.
    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }

    fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::new(error.to_string())
        }
    }
}

/// Capability for issuing a structured-data read against one URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadTransport: Send + Sync {
    /// Issue a GET declaring JSON on both request and response.
    async fn get_json(&self, url: &Url) -> Result<TransportResponse, TransportFailure>;
}

/// Reqwest-backed [`ReadTransport`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReadTransport for ReqwestTransport {
    async fn get_json(&self, url: &Url) -> Result<TransportResponse, TransportFailure> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|error| TransportFailure::from_reqwest(&error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| TransportFailure::from_reqwest(&error))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status_text(status),
            body: body.to_vec(),
        })
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || format!("status {}", status.as_u16()),
        str::to_owned,
    )
}
