//! Domain models shared by the backend and the browser

mod order;

pub use order::*;
