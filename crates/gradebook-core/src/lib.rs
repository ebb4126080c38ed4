//! Service plumbing shared by Gradebook services: configuration, tracing,
//! middleware, health probes and wire serializers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
