//! UNION-injection schema extraction against the vulnerable search
//! endpoint: payload construction, response heuristics, and the sequential
//! demo client.

pub mod client;
pub mod extract;
pub mod payloads;

pub use client::{ExploitClient, DEFAULT_BASE_URL};
