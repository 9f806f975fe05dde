//! Domain primitives, services and ports.
//!
//! Purpose: define the user record schemas at both ends of their life (as
//! received from the source and as consumed by presentation code), the pure
//! transformations between them, and the service that composes a repository
//! into the presentation-facing query port.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable failure category.
//! - WireUser / User: the two user record shapes.
//! - FieldSelection / UserField / UserProjection: normalizer inputs and output.
//! - UserDirectoryService: the service implementing the driving ports.

pub mod error;
pub mod normalizer;
pub mod ports;
pub mod user;
mod user_directory_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::normalizer::{
    FieldSelection, UserField, UserProjection, normalize_payload, normalize_user,
};
pub use self::user::{User, UserConversionError, WireUser, parse_timestamp};
pub use self::user_directory_service::UserDirectoryService;
