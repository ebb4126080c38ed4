//! Auth types shared across Gradebook services.
//!
//! Credential verification happens at the gateway; services only read the
//! identity it injects.

pub mod identity;

/// Header carrying the verified user id.
pub const USER_ID_HEADER: &str = "x-gradebook-user-id";
/// Header carrying the verified user role as its `u8` wire value.
pub const USER_ROLE_HEADER: &str = "x-gradebook-user-role";
