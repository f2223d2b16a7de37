//! Order model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: Uuid,
    /// `Order_<yyyyMMddHHmm>`, fixed at creation
    pub order_number: String,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: i64,
}

/// Create payload. The id and order number are generated by the repository.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: i64,
}

/// Partial update. Order number and order date are immutable.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub customer_name: String,
    pub total_amount: i64,
}
