//! Shared types and the cargo pricing engine for Shipquote
//!
//! This crate contains the rate resolution engine and the types shared between
//! the backend, the browser (via WASM) and other components of the system.

pub mod models;
pub mod pricing;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
