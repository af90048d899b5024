//! API layer - HTTP entry points and the scheduled retention trigger.

pub mod auth;
pub mod http;
pub mod retention;
