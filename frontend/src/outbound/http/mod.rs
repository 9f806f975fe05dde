//! HTTP outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `UserRepository`
//! port on top of an abstract read transport.

mod transport;
mod user_repository;

pub use transport::{ReadTransport, ReqwestTransport, TransportFailure, TransportResponse};
pub use user_repository::HttpUserRepository;
