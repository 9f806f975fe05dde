//! Inbound adapters driving the domain.
//!
//! Presentation code lives here and talks to the domain only through its
//! driving ports.

pub mod view;
