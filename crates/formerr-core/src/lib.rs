//! Shared HTTP and runtime plumbing for Formerr services.

pub mod clock;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
