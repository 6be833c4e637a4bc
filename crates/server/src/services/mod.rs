//! Business services.

pub mod auth;
