//! Order repository

use super::{RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderUpdate};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT: &str =
    "SELECT id, order_number, customer_name, order_date, total_amount FROM customer_order";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(SELECT).fetch_all(pool).await?;
    Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> RepoResult<Option<Order>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Create an order. The id and the order number (`Order_` + minute-precision
/// creation timestamp) are generated here.
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    let id = Uuid::new_v4();
    let order_number = format!("Order_{}", Utc::now().format("%Y%m%d%H%M"));

    sqlx::query(
        "INSERT INTO customer_order (id, order_number, customer_name, order_date, total_amount) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&order_number)
    .bind(&data.customer_name)
    .bind(data.order_date)
    .bind(data.total_amount)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Partial update: only customer name and total amount are mutable.
pub async fn update(pool: &SqlitePool, id: Uuid, data: OrderUpdate) -> RepoResult<Order> {
    let rows = sqlx::query(
        "UPDATE customer_order SET customer_name = ?, total_amount = ? WHERE id = ?",
    )
    .bind(&data.customer_name)
    .bind(data.total_amount)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Hard delete. Items are removed by the FK cascade.
pub async fn delete(pool: &SqlitePool, id: Uuid) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customer_order WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
