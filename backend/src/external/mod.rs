//! External API integrations

pub mod resend;

pub use resend::{OutgoingEmail, ResendClient};
