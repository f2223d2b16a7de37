//! Account routes - anonymous by design; the handlers issue the tokens the
//! protected routes require.

mod handler;

pub use handler::AuthenticationResponse;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/account", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route(
            "/isEmailAlreadyRegistered",
            get(handler::is_email_already_registered),
        )
        .route("/login", post(handler::login))
        .route("/logout", get(handler::logout))
        .route("/generateNewToken", post(handler::generate_new_token))
}
