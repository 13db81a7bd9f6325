//! Domain types shared across all Nhadat services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod listing;
pub mod pagination;
pub mod user;
