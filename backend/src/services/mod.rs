//! Business logic services for the Shipquote backend

pub mod assistant;
pub mod email;
pub mod orders;
pub mod pricing;

pub use assistant::AssistantService;
pub use email::ShipmentEmailService;
pub use orders::OrderService;
pub use pricing::PricingService;
