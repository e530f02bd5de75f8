//! Shipment order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::Carrier;

/// Lifecycle of a shipment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses reachable from this one
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Processing, OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    pub fn is_final(&self) -> bool {
        self.next_statuses().is_empty()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shipment request submitted through the public form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShipmentOrder {
    pub id: Uuid,
    pub sender_name: String,
    /// Turkish national identity number
    pub sender_tc: String,
    pub sender_address: String,
    pub sender_contact: String,
    pub sender_phone_code: String,
    pub receiver_name: String,
    pub receiver_address: String,
    pub city_postal: String,
    pub destination: String,
    pub receiver_contact: String,
    pub receiver_phone_code: String,
    pub receiver_email: String,
    pub content_description: String,
    /// Declared value of the contents
    pub content_value: Decimal,
    pub selected_carrier: Option<Carrier>,
    pub cargo_price: Option<Decimal>,
    pub service_type: Option<String>,
    pub package_quantity: i32,
    pub total_weight: Option<Decimal>,
    pub chargeable_weight: Option<Decimal>,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Count of orders going to one destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DestinationCount {
    pub destination: String,
    pub count: i64,
}

/// Dashboard statistics over all orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStats {
    pub total: i64,
    pub pending: i64,
    pub processing: i64,
    pub shipped: i64,
    pub delivered: i64,
    pub cancelled: i64,
    pub total_declared_value: Decimal,
    pub average_declared_value: Decimal,
    pub top_destinations: Vec<DestinationCount>,
}
