//! Order item handlers
//!
//! An item id is only meaningful within its stated parent order; a correct
//! id under the wrong order reads as missing.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::models::{OrderItem, OrderItemCreate, OrderItemUpdate};
use crate::db::repository::order_item as item_repo;
use crate::utils::validation::{MAX_NAME_LEN, check_min, check_required_text};
use crate::utils::{AppError, AppResult};

// ========== Request / response DTOs ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: i64,
}

impl OrderItemRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, &self.product_name, "ProductName", MAX_NAME_LEN);
        check_min(&mut errors, self.quantity, "Quantity", 1);
        check_min(&mut errors, self.unit_price, "UnitPrice", 1);
        errors
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub order_item_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub total_price: i64,
    pub order_id: Uuid,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            order_item_id: item.id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
            order_id: item.order_id,
        }
    }
}

// ========== Handlers ==========

/// GET /orders/{orderId}/items
pub async fn list(
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Vec<OrderItemResponse>>> {
    let items = item_repo::find_all(&state.pool, order_id).await?;
    Ok(Json(
        items.into_iter().map(OrderItemResponse::from).collect(),
    ))
}

/// POST /orders/{orderId}/items - total price is computed server-side
pub async fn create(
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<OrderItemRequest>,
) -> AppResult<impl IntoResponse> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join(",")));
    }

    let item = item_repo::create(
        &state.pool,
        order_id,
        OrderItemCreate {
            product_name: req.product_name,
            quantity: req.quantity,
            unit_price: req.unit_price,
        },
    )
    .await?;

    tracing::info!(order_id = %order_id, item_id = %item.id, "Order item created");

    let location = format!("/orders/{}/items/{}", order_id, item.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(OrderItemResponse::from(item)),
    ))
}

/// GET /orders/{orderId}/items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((order_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<OrderItemResponse>> {
    let item = item_repo::find_by_id(&state.pool, order_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order item doesn't exist"))?;
    Ok(Json(OrderItemResponse::from(item)))
}

/// PATCH /orders/{orderId}/items/{id} - recomputes the total price
pub async fn update(
    State(state): State<ServerState>,
    Path((order_id, id)): Path<(Uuid, Uuid)>,
    Json(req): Json<OrderItemRequest>,
) -> AppResult<Json<OrderItemResponse>> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join(",")));
    }

    // Missing item during update is a 400, not a 404; clients depend on it
    if item_repo::find_by_id(&state.pool, order_id, id)
        .await?
        .is_none()
    {
        tracing::warn!(order_id = %order_id, item_id = %id, "Order item not found while updating");
        return Err(AppError::invalid("Order item doesn't exist while updating data"));
    }

    let item = item_repo::update(
        &state.pool,
        order_id,
        id,
        OrderItemUpdate {
            product_name: req.product_name,
            quantity: req.quantity,
            unit_price: req.unit_price,
        },
    )
    .await?;

    tracing::info!(order_id = %order_id, item_id = %id, "Order item updated");
    Ok(Json(OrderItemResponse::from(item)))
}

/// DELETE /orders/{orderId}/items/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path((order_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let deleted = item_repo::delete(&state.pool, order_id, id).await?;
    if !deleted {
        return Err(AppError::not_found("Order item doesn't exist"));
    }

    tracing::info!(order_id = %order_id, item_id = %id, "Order item deleted");
    Ok(StatusCode::NO_CONTENT)
}
