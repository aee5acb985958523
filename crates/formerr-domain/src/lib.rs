//! Domain types shared across Formerr services.

pub mod role;
