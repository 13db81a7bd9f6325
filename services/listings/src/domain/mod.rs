pub mod code;
pub mod quality;
pub mod repository;
pub mod slug;
pub mod types;
