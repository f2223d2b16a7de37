//! Order handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderUpdate};
use crate::db::repository::order as order_repo;
use crate::utils::validation::{MAX_NAME_LEN, check_min, check_required_text};
use crate::utils::{AppError, AppResult};

// ========== Request / response DTOs ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddRequest {
    #[serde(default)]
    pub customer_name: String,
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_amount: i64,
}

impl OrderAddRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, &self.customer_name, "CustomerName", MAX_NAME_LEN);
        if self.order_date.is_none() {
            errors.push("The OrderDate field is required.".to_string());
        }
        check_min(&mut errors, self.total_amount, "TotalAmount", 1);
        errors
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdateRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub total_amount: i64,
}

impl OrderUpdateRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, &self.customer_name, "CustomerName", MAX_NAME_LEN);
        check_min(&mut errors, self.total_amount, "TotalAmount", 1);
        errors
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            order_number: order.order_number,
            customer_name: order.customer_name,
            order_date: order.order_date,
            total_amount: order.total_amount,
        }
    }
}

// ========== Handlers ==========

/// GET /orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = order_repo::find_all(&state.pool).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// POST /orders - 201 with a Location pointing at the new resource
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<OrderAddRequest>,
) -> AppResult<impl IntoResponse> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join(",")));
    }
    // validate() guarantees order_date is present
    let order_date = req.order_date.ok_or_else(|| {
        AppError::Validation("The OrderDate field is required.".to_string())
    })?;

    let order = order_repo::create(
        &state.pool,
        OrderCreate {
            customer_name: req.customer_name,
            order_date,
            total_amount: req.total_amount,
        },
    )
    .await?;

    tracing::info!(order_id = %order.id, order_number = %order.order_number, "Order created");

    let location = format!("/orders/{}", order.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(OrderResponse::from(order)),
    ))
}

/// GET /orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let order = order_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order doesn't exist"))?;
    Ok(Json(OrderResponse::from(order)))
}

/// PATCH /orders/{id} - only customer name and total amount are mutable
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OrderUpdateRequest>,
) -> AppResult<Json<OrderResponse>> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join(",")));
    }

    // Missing order during update is a 400, not a 404; clients depend on it
    if order_repo::find_by_id(&state.pool, id).await?.is_none() {
        tracing::warn!(order_id = %id, "Order not found while updating");
        return Err(AppError::invalid("Order doesn't exist while updating data"));
    }

    let order = order_repo::update(
        &state.pool,
        id,
        OrderUpdate {
            customer_name: req.customer_name,
            total_amount: req.total_amount,
        },
    )
    .await?;

    tracing::info!(order_id = %order.id, "Order updated");
    Ok(Json(OrderResponse::from(order)))
}

/// DELETE /orders/{id} - cascades to the order's items
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = order_repo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Order doesn't exist"));
    }

    tracing::info!(order_id = %id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}
