//! Order item repository
//!
//! Every lookup is scoped by the parent order id: an item id under a
//! different order is indistinguishable from a missing item.

use super::{RepoError, RepoResult};
use crate::db::models::{OrderItem, OrderItemCreate, OrderItemUpdate};
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT: &str =
    "SELECT id, order_id, product_name, quantity, unit_price, total_price FROM order_item";

pub async fn find_all(pool: &SqlitePool, order_id: Uuid) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{SELECT} WHERE order_id = ?");
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    order_id: Uuid,
    id: Uuid,
) -> RepoResult<Option<OrderItem>> {
    let sql = format!("{SELECT} WHERE order_id = ? AND id = ?");
    let item = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Create an item under `order_id`. The total price is computed here, never
/// taken from the caller. A missing parent order trips the FK and maps to
/// NotFound.
pub async fn create(
    pool: &SqlitePool,
    order_id: Uuid,
    data: OrderItemCreate,
) -> RepoResult<OrderItem> {
    let id = Uuid::new_v4();
    let total_price = total_price(data.quantity, data.unit_price)?;

    let result = sqlx::query(
        "INSERT INTO order_item (id, order_id, product_name, quantity, unit_price, total_price) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(&data.product_name)
    .bind(data.quantity)
    .bind(data.unit_price)
    .bind(total_price)
    .execute(pool)
    .await;

    if let Err(e) = result {
        if is_foreign_key_violation(&e) {
            return Err(RepoError::NotFound(format!("Order {order_id} not found")));
        }
        return Err(e.into());
    }

    find_by_id(pool, order_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order item".into()))
}

/// Update an item, recomputing the total price from the new quantity and
/// unit price.
pub async fn update(
    pool: &SqlitePool,
    order_id: Uuid,
    id: Uuid,
    data: OrderItemUpdate,
) -> RepoResult<OrderItem> {
    let total_price = total_price(data.quantity, data.unit_price)?;
    let rows = sqlx::query(
        "UPDATE order_item SET product_name = ?, quantity = ?, unit_price = ?, total_price = ? WHERE order_id = ? AND id = ?",
    )
    .bind(&data.product_name)
    .bind(data.quantity)
    .bind(data.unit_price)
    .bind(total_price)
    .bind(order_id)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order item {id} not found")));
    }
    find_by_id(pool, order_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, order_id: Uuid, id: Uuid) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM order_item WHERE order_id = ? AND id = ?")
        .bind(order_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Multiply quantity by unit price, rejecting products that do not fit in
/// an i64 instead of wrapping.
fn total_price(quantity: i64, unit_price: i64) -> RepoResult<i64> {
    quantity
        .checked_mul(unit_price)
        .ok_or_else(|| RepoError::Validation("The computed TotalPrice is out of range.".to_string()))
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.message().contains("FOREIGN KEY constraint failed"))
}
