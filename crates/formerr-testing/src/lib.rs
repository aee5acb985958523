//! Test utilities for Formerr services.
//!
//! Provides `MockAuth` for minting bearer tokens and `ManualClock` for driving
//! time-dependent logic. Import from tests only, never from production code.

pub mod auth;
pub mod clock;
