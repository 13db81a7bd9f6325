//! sea-orm entities for tables owned by the auth service.

pub mod users;
