pub mod auth;
pub mod otp;
pub mod profile;
pub mod token;
