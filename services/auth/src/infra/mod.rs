pub mod cache;
pub mod db;
pub mod memory;
pub mod otp_store;
pub mod password;
