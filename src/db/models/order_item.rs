//! Order item model

use sqlx::FromRow;
use uuid::Uuid;

/// Line item owned by exactly one order. `total_price` is always
/// `quantity * unit_price`, computed at write time.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub total_price: i64,
}

#[derive(Debug, Clone)]
pub struct OrderItemCreate {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: i64,
}

#[derive(Debug, Clone)]
pub struct OrderItemUpdate {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: i64,
}
