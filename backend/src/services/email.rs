//! Shipment request notification email

use serde::Serialize;
use shared::ShipmentOrder;

use crate::config::EmailConfig;
use crate::external::{OutgoingEmail, ResendClient};

/// Sends the operations team a summary of each new shipment request
#[derive(Clone)]
pub struct ShipmentEmailService {
    client: Option<ResendClient>,
    from: String,
    to: String,
}

/// Result of a notification attempt
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailOutcome {
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShipmentEmailService {
    pub fn new(config: &EmailConfig) -> Self {
        let client = config
            .api_key
            .as_ref()
            .filter(|_| config.is_enabled())
            .map(|key| ResendClient::with_base_url(key.clone(), config.api_base.clone()));

        Self {
            client,
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Render and send the notification; failures are logged, never raised
    pub async fn send_shipment_request(&self, order: &ShipmentOrder) -> EmailOutcome {
        let Some(client) = &self.client else {
            tracing::warn!(order_id = %order.id, "Email disabled, shipment notification skipped");
            return EmailOutcome {
                sent: false,
                message_id: None,
                error: Some("Email service is not configured".to_string()),
            };
        };

        let email = OutgoingEmail {
            from: self.from.clone(),
            to: vec![self.to.clone()],
            subject: subject(order),
            html: render_shipment_html(order),
            reply_to: Some(order.receiver_email.clone()).filter(|e| !e.is_empty()),
        };

        match client.send(&email).await {
            Ok(id) => {
                tracing::info!(order_id = %order.id, message_id = %id, "Shipment notification sent");
                EmailOutcome {
                    sent: true,
                    message_id: Some(id),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(order_id = %order.id, "Shipment notification failed: {}", e);
                EmailOutcome {
                    sent: false,
                    message_id: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

pub fn subject(order: &ShipmentOrder) -> String {
    format!(
        "New Shipment Request - {} to {}",
        order.sender_name, order.destination
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><td style=\"padding:4px 12px 4px 0;color:#555\">{}</td><td style=\"padding:4px 0\"><strong>{}</strong></td></tr>",
        escape_html(label),
        escape_html(value)
    )
}

fn section(title: &str, rows: &[String]) -> String {
    format!(
        "<h3 style=\"margin:20px 0 8px\">{}</h3><table>{}</table>",
        escape_html(title),
        rows.concat()
    )
}

/// HTML body of the notification; every value is escaped
pub fn render_shipment_html(order: &ShipmentOrder) -> String {
    let sender = section(
        "Sender",
        &[
            row("Name", &order.sender_name),
            row("TC Kimlik No", &order.sender_tc),
            row("Address", &order.sender_address),
            row("Phone", &format!("{} {}", order.sender_phone_code, order.sender_contact)),
        ],
    );

    let receiver = section(
        "Receiver",
        &[
            row("Name", &order.receiver_name),
            row("Address", &order.receiver_address),
            row("City / Postal code", &order.city_postal),
            row("Country", &order.destination),
            row("Phone", &format!("{} {}", order.receiver_phone_code, order.receiver_contact)),
            row("Email", &order.receiver_email),
        ],
    );

    let mut shipment_rows = vec![
        row("Content", &order.content_description),
        row("Declared value", &format!("${}", order.content_value)),
        row("Packages", &order.package_quantity.to_string()),
    ];
    if let Some(carrier) = order.selected_carrier {
        shipment_rows.push(row("Carrier", carrier.as_str()));
    }
    if let Some(service) = &order.service_type {
        shipment_rows.push(row("Service", service));
    }
    if let Some(weight) = order.total_weight {
        shipment_rows.push(row("Total weight", &format!("{} kg", weight)));
    }
    if let Some(weight) = order.chargeable_weight {
        shipment_rows.push(row("Chargeable weight", &format!("{} kg", weight)));
    }
    if let Some(price) = order.cargo_price {
        shipment_rows.push(row("Quoted price", &format!("${}", price)));
    }
    let shipment = section("Shipment", &shipment_rows);

    format!(
        "<div style=\"font-family:Arial,sans-serif;font-size:14px\">\
         <h2>New Shipment Request</h2>\
         <p>Submitted {}. Reference {}.</p>{}{}{}</div>",
        order.created_at.format("%Y-%m-%d %H:%M UTC"),
        order.id,
        sender,
        receiver,
        shipment
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::pricing::Carrier;
    use shared::OrderStatus;
    use uuid::Uuid;

    fn order() -> ShipmentOrder {
        ShipmentOrder {
            id: Uuid::new_v4(),
            sender_name: "Ayşe <Yılmaz>".to_string(),
            sender_tc: "10000000146".to_string(),
            sender_address: "Kadıköy".to_string(),
            sender_contact: "5321234567".to_string(),
            sender_phone_code: "+90".to_string(),
            receiver_name: "Hans & Co".to_string(),
            receiver_address: "Hauptstraße 1".to_string(),
            city_postal: "Berlin 10115".to_string(),
            destination: "Germany".to_string(),
            receiver_contact: "301234567".to_string(),
            receiver_phone_code: "+49".to_string(),
            receiver_email: "hans@example.de".to_string(),
            content_description: "<script>alert(1)</script>".to_string(),
            content_value: Decimal::from(120),
            selected_carrier: Some(Carrier::Dhl),
            cargo_price: Some(Decimal::new(4100, 2)),
            service_type: Some("DHL Express".to_string()),
            package_quantity: 1,
            total_weight: Some(Decimal::from(5)),
            chargeable_weight: Some(Decimal::from(5)),
            status: OrderStatus::Pending,
            tracking_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subject() {
        assert_eq!(subject(&order()), "New Shipment Request - Ayşe <Yılmaz> to Germany");
    }

    #[test]
    fn test_html_is_escaped() {
        let html = render_shipment_html(&order());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Hans &amp; Co"));
        assert!(html.contains("DHL Express"));
        assert!(html.contains("$41.00"));
    }

    #[test]
    fn test_disabled_service_reports_not_sent() {
        let service = ShipmentEmailService {
            client: None,
            from: "a@example.com".into(),
            to: "b@example.com".into(),
        };
        assert!(!service.is_enabled());
        let outcome = tokio_test::block_on(service.send_shipment_request(&order()));
        assert!(!outcome.sent);
        assert!(outcome.error.is_some());
    }
}
