//! User record schemas.
//!
//! A user exists in two shapes. [`WireUser`] is the record exactly as the
//! source serialises it: timestamps are text. [`User`] is the presentation
//! record: the same fields, with timestamps parsed into UTC instants. The
//! only way to obtain a [`User`] is the exhaustive conversion from one
//! [`WireUser`], so every wire field has a presentation counterpart.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback layout for timestamps that omit an offset.
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// User record as received from the data source.
///
/// Field names are camelCase on the wire. Unknown fields are ignored so a
/// superset payload still decodes; trimming such payloads is the
/// normalizer's job.
///
/// # Examples
/// ```
/// use frontend::domain::WireUser;
///
/// let wire: WireUser = serde_json::from_str(
///     r#"{"id":1,"firstName":"Ada","lastName":"Lovelace",
///         "createdAt":"1970-01-01T00:00:00Z","updatedAt":"1970-01-01T00:00:00Z"}"#,
/// )
/// .expect("valid wire user");
/// assert_eq!(wire.first_name(), "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    id: i64,
    first_name: String,
    last_name: String,
    created_at: String,
    updated_at: String,
}

impl WireUser {
    /// Build a wire record from its raw parts.
    pub fn new(
        id: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }

    /// Stable numeric identity.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Given name exactly as sent.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name exactly as sent.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Creation timestamp as serialised by the source.
    pub fn created_at(&self) -> &str {
        self.created_at.as_str()
    }

    /// Last-update timestamp as serialised by the source.
    pub fn updated_at(&self) -> &str {
        self.updated_at.as_str()
    }
}

/// Failure converting a [`WireUser`] into a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserConversionError {
    /// A temporal field did not hold a parseable timestamp.
    #[error("user {id} has an invalid {field} timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        id: i64,
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl UserConversionError {
    /// Identity of the record that failed to convert.
    pub fn user_id(&self) -> i64 {
        match self {
            Self::InvalidTimestamp { id, .. } => *id,
        }
    }

    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidTimestamp { field, .. } => field,
        }
    }
}

/// Parse a textual timestamp into a UTC instant.
///
/// RFC 3339 is tried first. A date-time without an offset is accepted as a
/// fallback and read as UTC.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use frontend::domain::parse_timestamp;
///
/// let parsed = parse_timestamp("1970-01-01T00:00:00Z").expect("valid timestamp");
/// assert_eq!(parsed, DateTime::<Utc>::UNIX_EPOCH);
/// ```
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|rfc3339_error| {
            NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT)
                .map(|naive| naive.and_utc())
                .map_err(|_| rfc3339_error)
        })
}

/// User record as consumed by presentation code.
///
/// ## Invariants
/// - Non-temporal fields equal those of the [`WireUser`] it came from.
/// - `created_at` and `updated_at` are the parsed instants of the wire text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i64,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Stable numeric identity carried over from the wire record.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Given name, untrimmed.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name, untrimmed.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Instant the record was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Instant the record was last updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// First and last name joined by a space, skipping blank parts.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<WireUser> for User {
    type Error = UserConversionError;

    fn try_from(value: WireUser) -> Result<Self, Self::Error> {
        let WireUser {
            id,
            first_name,
            last_name,
            created_at,
            updated_at,
        } = value;

        let created_at = parse_field(id, "createdAt", created_at)?;
        let updated_at = parse_field(id, "updatedAt", updated_at)?;
        Ok(Self {
            id,
            first_name,
            last_name,
            created_at,
            updated_at,
        })
    }
}

fn parse_field(
    id: i64,
    field: &'static str,
    value: String,
) -> Result<DateTime<Utc>, UserConversionError> {
    parse_timestamp(&value).map_err(|err| UserConversionError::InvalidTimestamp {
        id,
        field,
        reason: err.to_string(),
        value,
    })
}
