//! Test utilities for Gradebook services.
//!
//! Import from test targets only, never from production code.

pub mod auth;
