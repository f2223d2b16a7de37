//! Order and order item API integration tests.

mod common;

use common::{app, register_user, send, send_full, test_state};
use http::StatusCode;
use serde_json::{Value, json};

async fn authed_app() -> (axum::Router, String) {
    let state = test_state().await;
    let app = app(&state);
    let (token, _) = register_user(&app, "orders@example.com", "orders").await;
    (app, token)
}

async fn create_order(app: &axum::Router, token: &str, customer: &str, amount: i64) -> Value {
    let (status, headers, body) = send_full(
        app,
        "POST",
        "/orders",
        Some(token),
        Some(json!({
            "customerName": customer,
            "orderDate": "2024-01-01T00:00:00Z",
            "totalAmount": amount,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "order creation failed: {body}");
    assert!(headers.contains_key(http::header::LOCATION));
    body
}

#[tokio::test]
async fn orders_require_authentication() {
    let state = test_state().await;
    let app = app(&state);

    let (status, _) = send(&app, "GET", "/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/orders", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_order_scenario() {
    let (app, token) = authed_app().await;

    let (status, headers, body) = send_full(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(json!({
            "customerName": "Alice",
            "orderDate": "2024-01-01T00:00:00Z",
            "totalAmount": 100,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["orderId"].as_str().unwrap();
    assert!(!order_id.is_empty());

    let order_number = body["orderNumber"].as_str().unwrap();
    assert!(order_number.starts_with("Order_"));
    // Order_ + yyyyMMddHHmm
    assert_eq!(order_number.len(), "Order_".len() + 12);

    let location = headers[http::header::LOCATION].to_str().unwrap();
    assert_eq!(location, format!("/orders/{order_id}"));

    // Below-range total amount is rejected on update
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/orders/{order_id}"),
        Some(&token),
        Some(json!({"customerName": "Alice", "totalAmount": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_crud_roundtrip() {
    let (app, token) = authed_app().await;

    let created = create_order(&app, &token, "Bob", 50).await;
    let id = created["orderId"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Partial update: only customer name and total amount change
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/orders/{id}"),
        Some(&token),
        Some(json!({"customerName": "Robert", "totalAmount": 75})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customerName"], "Robert");
    assert_eq!(body["totalAmount"], 75);
    assert_eq!(body["orderNumber"], created["orderNumber"]);
    assert_eq!(body["orderDate"], created["orderDate"]);

    let (status, _) = send(&app, "DELETE", &format!("/orders/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/orders/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updating_missing_order_is_a_bad_request() {
    let (app, token) = authed_app().await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/orders/{}", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({"customerName": "Ghost", "totalAmount": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"].as_str().unwrap(),
        "Order doesn't exist while updating data"
    );
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let (app, token) = authed_app().await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/orders/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/orders/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_total_price_is_always_computed() {
    let (app, token) = authed_app().await;

    let order = create_order(&app, &token, "Carol", 100).await;
    let order_id = order["orderId"].as_str().unwrap();

    let (status, headers, body) = send_full(
        &app,
        "POST",
        &format!("/orders/{order_id}/items"),
        Some(&token),
        Some(json!({"productName": "Widget", "quantity": 3, "unitPrice": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalPrice"], 21);
    assert_eq!(body["orderId"].as_str().unwrap(), order_id);

    let item_id = body["orderItemId"].as_str().unwrap().to_string();
    let location = headers[http::header::LOCATION].to_str().unwrap();
    assert_eq!(location, format!("/orders/{order_id}/items/{item_id}"));

    // Update recomputes the total from the new quantity and unit price
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/items/{item_id}"),
        Some(&token),
        Some(json!({"productName": "Widget", "quantity": 5, "unitPrice": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPrice"], 10);
}

#[tokio::test]
async fn item_validation_rejects_out_of_range_values() {
    let (app, token) = authed_app().await;

    let order = create_order(&app, &token, "Dave", 100).await;
    let order_id = order["orderId"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/items"),
        Some(&token),
        Some(json!({"productName": "Widget", "quantity": 0, "unitPrice": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/items"),
        Some(&token),
        Some(json!({"productName": "", "quantity": 1, "unitPrice": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_total_price_overflow_is_a_bad_request() {
    let (app, token) = authed_app().await;

    let order = create_order(&app, &token, "Henry", 10).await;
    let order_id = order["orderId"].as_str().unwrap();

    // quantity * unitPrice does not fit in an i64
    let (status, body) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/items"),
        Some(&token),
        Some(json!({"productName": "Bulk", "quantity": i64::MAX, "unitPrice": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"].as_str().unwrap(),
        "The computed TotalPrice is out of range."
    );

    // The update path guards the same computation
    let (_, body) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/items"),
        Some(&token),
        Some(json!({"productName": "Bulk", "quantity": 1, "unitPrice": 1})),
    )
    .await;
    let item_id = body["orderItemId"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/items/{item_id}"),
        Some(&token),
        Some(json!({"productName": "Bulk", "quantity": 2, "unitPrice": i64::MAX})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updating_missing_item_is_a_bad_request() {
    let (app, token) = authed_app().await;

    let order = create_order(&app, &token, "Iris", 10).await;
    let order_id = order["orderId"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/items/{}", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({"productName": "Ghost", "quantity": 1, "unitPrice": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"].as_str().unwrap(),
        "Order item doesn't exist while updating data"
    );
}

#[tokio::test]
async fn item_under_wrong_parent_is_not_found() {
    let (app, token) = authed_app().await;

    let order_a = create_order(&app, &token, "Erin", 10).await;
    let order_b = create_order(&app, &token, "Frank", 20).await;
    let order_a_id = order_a["orderId"].as_str().unwrap();
    let order_b_id = order_b["orderId"].as_str().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        &format!("/orders/{order_a_id}/items"),
        Some(&token),
        Some(json!({"productName": "Gadget", "quantity": 1, "unitPrice": 5})),
    )
    .await;
    let item_id = body["orderItemId"].as_str().unwrap().to_string();

    // Right id, wrong parent
    let (status, _) = send(
        &app,
        "GET",
        &format!("/orders/{order_b_id}/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/orders/{order_b_id}/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Right parent still works
    let (status, _) = send(
        &app,
        "GET",
        &format!("/orders/{order_a_id}/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn item_under_missing_order_is_not_found() {
    let (app, token) = authed_app().await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/orders/{}/items", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({"productName": "Orphan", "quantity": 1, "unitPrice": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_order_cascades_to_its_items() {
    let (app, token) = authed_app().await;

    let order = create_order(&app, &token, "Grace", 30).await;
    let order_id = order["orderId"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/items"),
        Some(&token),
        Some(json!({"productName": "Bolt", "quantity": 2, "unitPrice": 3})),
    )
    .await;
    let item_id = body["orderItemId"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/orders/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/orders/{order_id}/items"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/orders/{order_id}/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
