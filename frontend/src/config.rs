//! Frontend configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_USERS_URL: &str = "http://localhost:8080/api/v1/users";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Reasons a loaded configuration cannot be used.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("users URL `{value}` is invalid: {reason}")]
    InvalidUsersUrl { value: String, reason: String },
    #[error("unknown log format `{0}`; expected `json` or `pretty`")]
    UnknownLogFormat(String),
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Configuration values controlling how the users view reaches its source.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FRONTEND")]
pub struct FrontendSettings {
    /// Absolute URL of the users endpoint.
    pub users_url: Option<String>,
    /// Per-request timeout in whole seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Log output format, `json` or `pretty`.
    pub log_format: Option<String>,
}

impl FrontendSettings {
    /// Return the users endpoint, falling back to the local default.
    pub fn users_url(&self) -> Result<Url, SettingsError> {
        let raw = self.users_url.as_deref().unwrap_or(DEFAULT_USERS_URL);
        Url::parse(raw).map_err(|err| SettingsError::InvalidUsersUrl {
            value: raw.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Return the per-request timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the configured log format, JSON unless told otherwise.
    pub fn log_format(&self) -> Result<LogFormat, SettingsError> {
        match self.log_format.as_deref().map(str::trim) {
            None => Ok(LogFormat::Json),
            Some(raw) if raw.eq_ignore_ascii_case("json") => Ok(LogFormat::Json),
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => Ok(LogFormat::Pretty),
            Some(raw) => Err(SettingsError::UnknownLogFormat(raw.to_owned())),
        }
    }
}
