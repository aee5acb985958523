//! Auth types shared across Formerr services.
//!
//! Provides JWT validation and the `BearerToken` extractor.

pub mod identity;
pub mod token;
