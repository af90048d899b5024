//! Infrastructure implementations.
//!
//! Contains the store port and its Postgres implementation.

pub mod correlation;
pub mod ports;
pub mod postgres;
