//! Order routes - authentication required

mod handler;

pub use handler::OrderResponse;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Same capture name as the nested items router; the router requires
        // consistent parameter names for the segment.
        .route(
            "/{order_id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
}
