//! Layered user-directory data access.
//!
//! The crate follows a hexagonal layout:
//! - `domain` owns the record schemas, the normalizer, the service and the
//!   ports it is written against;
//! - `outbound` implements the repository port over HTTP;
//! - `inbound` hosts the presentation consumer, which only ever sees the
//!   service through the [`domain::ports::UsersQuery`] port.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::{FrontendSettings, LogFormat, SettingsError};
