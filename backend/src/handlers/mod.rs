//! HTTP handlers

pub mod assistant;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod pricing;

pub use assistant::*;
pub use health::*;
pub use notifications::*;
pub use orders::*;
pub use pricing::*;
