//! Order store: shipment requests in the `form_submissions` table

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::pricing::Carrier;
use shared::{
    validate_phone, validate_phone_code, validate_status_transition, validate_tc_kimlik_no, DestinationCount,
    OrderStats, OrderStatus, PaginatedResponse, Pagination, PaginationMeta, ShipmentOrder,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Order service for the admin dashboard and the public form
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

const ORDER_COLUMNS: &str = "id, sender_name, sender_tc, sender_address, sender_contact, sender_phone_code, \
     receiver_name, receiver_address, city_postal, destination, receiver_contact, receiver_phone_code, \
     receiver_email, content_description, content_value, selected_carrier, cargo_price, service_type, \
     package_quantity, total_weight, chargeable_weight, status, tracking_number, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    sender_name: String,
    sender_tc: String,
    sender_address: String,
    sender_contact: String,
    sender_phone_code: String,
    receiver_name: String,
    receiver_address: String,
    city_postal: String,
    destination: String,
    receiver_contact: String,
    receiver_phone_code: String,
    receiver_email: String,
    content_description: String,
    content_value: Decimal,
    selected_carrier: Option<String>,
    cargo_price: Option<Decimal>,
    service_type: Option<String>,
    package_quantity: i32,
    total_weight: Option<Decimal>,
    chargeable_weight: Option<Decimal>,
    status: String,
    tracking_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for ShipmentOrder {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown order status in database: {}", row.status)))?;
        let selected_carrier = row
            .selected_carrier
            .as_deref()
            .map(str::parse::<Carrier>)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Unknown carrier in database: {}", e)))?;

        Ok(ShipmentOrder {
            id: row.id,
            sender_name: row.sender_name,
            sender_tc: row.sender_tc,
            sender_address: row.sender_address,
            sender_contact: row.sender_contact,
            sender_phone_code: row.sender_phone_code,
            receiver_name: row.receiver_name,
            receiver_address: row.receiver_address,
            city_postal: row.city_postal,
            destination: row.destination,
            receiver_contact: row.receiver_contact,
            receiver_phone_code: row.receiver_phone_code,
            receiver_email: row.receiver_email,
            content_description: row.content_description,
            content_value: row.content_value,
            selected_carrier,
            cargo_price: row.cargo_price,
            service_type: row.service_type,
            package_quantity: row.package_quantity,
            total_weight: row.total_weight,
            chargeable_weight: row.chargeable_weight,
            status,
            tracking_number: row.tracking_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn tc_kimlik_no(value: &str) -> Result<(), ValidationError> {
    validate_tc_kimlik_no(value).map_err(|_| ValidationError::new("tc_kimlik_no"))
}

fn phone(value: &str) -> Result<(), ValidationError> {
    validate_phone(value).map_err(|_| ValidationError::new("phone"))
}

fn phone_code(value: &str) -> Result<(), ValidationError> {
    validate_phone_code(value).map_err(|_| ValidationError::new("phone_code"))
}

/// Query parameters for listing orders
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    /// A status name, or `all`
    pub status: Option<String>,
}

/// Input for creating an order from the shipment form
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    #[validate(length(min = 1, max = 200))]
    pub sender_name: String,
    #[validate(custom = "tc_kimlik_no")]
    pub sender_tc: String,
    #[validate(length(min = 1))]
    pub sender_address: String,
    #[validate(custom = "phone")]
    pub sender_contact: String,
    #[validate(custom = "phone_code")]
    pub sender_phone_code: String,
    #[validate(length(min = 1, max = 200))]
    pub receiver_name: String,
    #[validate(length(min = 1))]
    pub receiver_address: String,
    #[validate(length(min = 1, max = 200))]
    pub city_postal: String,
    #[validate(length(min = 1, max = 100))]
    pub destination: String,
    #[validate(custom = "phone")]
    pub receiver_contact: String,
    #[validate(custom = "phone_code")]
    pub receiver_phone_code: String,
    #[validate(email)]
    pub receiver_email: String,
    #[validate(length(min = 1))]
    pub content_description: String,
    pub content_value: Decimal,
    pub selected_carrier: Option<Carrier>,
    pub cargo_price: Option<Decimal>,
    pub service_type: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub package_quantity: i32,
    pub total_weight: Option<Decimal>,
    pub chargeable_weight: Option<Decimal>,
}

/// Input for updating order fields from the dashboard
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderInput {
    pub receiver_name: Option<String>,
    pub receiver_address: Option<String>,
    pub city_postal: Option<String>,
    pub destination: Option<String>,
    pub receiver_contact: Option<String>,
    pub receiver_email: Option<String>,
    pub content_description: Option<String>,
    pub content_value: Option<Decimal>,
    pub selected_carrier: Option<Carrier>,
    pub cargo_price: Option<Decimal>,
    pub service_type: Option<String>,
    pub package_quantity: Option<i32>,
    pub total_weight: Option<Decimal>,
    pub chargeable_weight: Option<Decimal>,
}

/// Input for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
}

/// `%term%` for ILIKE, or `None` for a blank search
fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

/// Status filter, `all` and blanks meaning no filter
fn status_filter(status: Option<&str>) -> AppResult<Option<OrderStatus>> {
    match status.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(name) => OrderStatus::parse(name)
            .map(Some)
            .ok_or_else(|| AppError::validation("status", "Unknown order status", "Bilinmeyen sipariş durumu")),
    }
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List orders newest first, with search and status filter
    pub async fn list_orders(&self, query: ListOrdersQuery) -> AppResult<PaginatedResponse<ShipmentOrder>> {
        let pagination = Pagination::new(query.page, query.per_page);
        let pattern = search_pattern(query.search.as_deref());
        let status = status_filter(query.status.as_deref())?.map(|s| s.as_str());

        let filter = r#"
            ($1::text IS NULL OR id::text ILIKE $1 OR sender_name ILIKE $1 OR receiver_name ILIKE $1
                OR receiver_email ILIKE $1 OR destination ILIKE $1 OR sender_tc ILIKE $1)
            AND ($2::text IS NULL OR status = $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM form_submissions WHERE {}", filter))
            .bind(&pattern)
            .bind(status)
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM form_submissions WHERE {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            ORDER_COLUMNS, filter
        ))
        .bind(&pattern)
        .bind(status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(ShipmentOrder::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, u64::try_from(total).unwrap_or(0)),
        })
    }

    /// Get an order by ID
    pub async fn get_order(&self, id: Uuid) -> AppResult<ShipmentOrder> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM form_submissions WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        row.try_into()
    }

    /// Store a new shipment request with status `pending`
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<ShipmentOrder> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        if input.content_value < Decimal::ZERO {
            return Err(AppError::validation(
                "content_value",
                "Declared value cannot be negative",
                "Beyan edilen değer negatif olamaz",
            ));
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO form_submissions (
                id, sender_name, sender_tc, sender_address, sender_contact, sender_phone_code,
                receiver_name, receiver_address, city_postal, destination, receiver_contact,
                receiver_phone_code, receiver_email, content_description, content_value,
                selected_carrier, cargo_price, service_type, package_quantity, total_weight,
                chargeable_weight, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, 'pending', NOW(), NOW())
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(input.sender_name.trim())
        .bind(input.sender_tc.trim())
        .bind(&input.sender_address)
        .bind(&input.sender_contact)
        .bind(&input.sender_phone_code)
        .bind(input.receiver_name.trim())
        .bind(&input.receiver_address)
        .bind(&input.city_postal)
        .bind(input.destination.trim())
        .bind(&input.receiver_contact)
        .bind(&input.receiver_phone_code)
        .bind(input.receiver_email.trim())
        .bind(&input.content_description)
        .bind(input.content_value)
        .bind(input.selected_carrier.map(|c| c.as_str()))
        .bind(input.cargo_price)
        .bind(&input.service_type)
        .bind(input.package_quantity)
        .bind(input.total_weight)
        .bind(input.chargeable_weight)
        .fetch_one(&self.db)
        .await?;

        let order = ShipmentOrder::try_from(row)?;
        tracing::info!(order_id = %order.id, destination = %order.destination, "Order created");
        Ok(order)
    }

    /// Update editable fields; absent fields keep their value
    pub async fn update_order(&self, id: Uuid, input: UpdateOrderInput) -> AppResult<ShipmentOrder> {
        if let Some(email) = input.receiver_email.as_deref() {
            shared::validate_email(email)
                .map_err(|msg| AppError::validation("receiver_email", msg, "Geçersiz e-posta adresi"))?;
        }
        if matches!(input.package_quantity, Some(q) if q < 1) {
            return Err(AppError::validation(
                "package_quantity",
                "Quantity must be at least 1",
                "Adet en az 1 olmalıdır",
            ));
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE form_submissions SET
                receiver_name = COALESCE($2, receiver_name),
                receiver_address = COALESCE($3, receiver_address),
                city_postal = COALESCE($4, city_postal),
                destination = COALESCE($5, destination),
                receiver_contact = COALESCE($6, receiver_contact),
                receiver_email = COALESCE($7, receiver_email),
                content_description = COALESCE($8, content_description),
                content_value = COALESCE($9, content_value),
                selected_carrier = COALESCE($10, selected_carrier),
                cargo_price = COALESCE($11, cargo_price),
                service_type = COALESCE($12, service_type),
                package_quantity = COALESCE($13, package_quantity),
                total_weight = COALESCE($14, total_weight),
                chargeable_weight = COALESCE($15, chargeable_weight),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(&input.receiver_name)
        .bind(&input.receiver_address)
        .bind(&input.city_postal)
        .bind(&input.destination)
        .bind(&input.receiver_contact)
        .bind(&input.receiver_email)
        .bind(&input.content_description)
        .bind(input.content_value)
        .bind(input.selected_carrier.map(|c| c.as_str()))
        .bind(input.cargo_price)
        .bind(&input.service_type)
        .bind(input.package_quantity)
        .bind(input.total_weight)
        .bind(input.chargeable_weight)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        row.try_into()
    }

    /// Move an order to a new status, optionally recording a tracking number
    pub async fn update_status(&self, id: Uuid, input: UpdateStatusInput) -> AppResult<ShipmentOrder> {
        let current = self.get_order(id).await?;
        validate_status_transition(current.status, input.status).map_err(|msg| {
            AppError::InvalidStateTransition(format!("{} ({} → {})", msg, current.status, input.status))
        })?;

        let tracking_number = input
            .tracking_number
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE form_submissions
            SET status = $2, tracking_number = COALESCE($3, tracking_number), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(input.status.as_str())
        .bind(tracking_number)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(order_id = %id, status = %input.status, "Order status updated");
        row.try_into()
    }

    /// Per-status counts, declared value totals and the ten most frequent destinations
    pub async fn stats(&self) -> AppResult<OrderStats> {
        let counts = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM form_submissions GROUP BY status",
        )
        .fetch_all(&self.db)
        .await?;

        let (total_value, average_value) = sqlx::query_as::<_, (Option<Decimal>, Option<Decimal>)>(
            "SELECT SUM(content_value), AVG(content_value) FROM form_submissions",
        )
        .fetch_one(&self.db)
        .await?;

        let top_destinations = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT destination, COUNT(*) AS count
            FROM form_submissions
            GROUP BY destination
            ORDER BY count DESC, destination ASC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(destination, count)| DestinationCount { destination, count })
        .collect();

        Ok(build_stats(&counts, total_value, average_value, top_destinations))
    }
}

fn build_stats(
    counts: &[(String, i64)],
    total_value: Option<Decimal>,
    average_value: Option<Decimal>,
    top_destinations: Vec<DestinationCount>,
) -> OrderStats {
    let count_of = |status: OrderStatus| {
        counts
            .iter()
            .find(|(name, _)| name == status.as_str())
            .map(|(_, n)| *n)
            .unwrap_or(0)
    };

    OrderStats {
        total: counts.iter().map(|(_, n)| n).sum(),
        pending: count_of(OrderStatus::Pending),
        processing: count_of(OrderStatus::Processing),
        shipped: count_of(OrderStatus::Shipped),
        delivered: count_of(OrderStatus::Delivered),
        cancelled: count_of(OrderStatus::Cancelled),
        total_declared_value: total_value.unwrap_or(Decimal::ZERO),
        average_declared_value: average_value.unwrap_or(Decimal::ZERO).round_dp(2),
        top_destinations,
    }
}
