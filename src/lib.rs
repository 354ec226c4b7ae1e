//! Deliberately vulnerable SQL injection teaching backend.
//!
//! The login and search endpoints build SQL by direct string interpolation
//! on purpose; the `exploit` module drives them to extract the database
//! schema through UNION-based injection. Never deploy this anywhere
//! reachable from an untrusted network.

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod exploit;
pub mod inventory;
pub mod session;
pub mod state;
