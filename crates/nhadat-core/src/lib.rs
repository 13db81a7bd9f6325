//! Cross-service plumbing: health checks, request tracing, serde helpers and
//! sea-orm query extensions.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
