//! Auth types shared across Nhadat services.
//!
//! Provides JWT claims, access-token validation, and the bearer `Identity` extractor.

pub mod identity;
pub mod token;
