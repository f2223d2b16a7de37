//! Account handlers
//!
//! Registration, login, logout and refresh-token rotation. Per-request state
//! only: identity travels as tokens, never as server-side session storage.

use std::time::Duration;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::user as user_repo;
use crate::services::Registration;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_PHONE_LEN, check_email, check_required_text,
};
use crate::utils::{AppError, AppResult};

/// Fixed delay for credential checks to blunt timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

// ========== Request / response DTOs ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub person_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    /// Defaults to the email when absent
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, &self.person_name, "PersonName", MAX_NAME_LEN);
        check_required_text(&mut errors, &self.phone_number, "PhoneNumber", MAX_PHONE_LEN);
        check_email(&mut errors, &self.email, "Email");
        check_required_text(&mut errors, &self.password, "Password", MAX_PASSWORD_LEN);
        if self.confirm_password != self.password {
            errors.push("'ConfirmPassword' and 'Password' do not match.".to_string());
        }
        errors
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Issued token pair returned by register, login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub token: String,
    pub expiration: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expiration: DateTime<Utc>,
}

// ========== Handlers ==========

/// POST /account/register
///
/// Creates the account and signs the caller in by returning a token pair.
/// All validation failures come back joined into one problem detail.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<AuthenticationResponse>> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join(",")));
    }

    let username = req
        .username
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| req.email.clone());

    let user = state
        .identity
        .register(Registration {
            person_name: req.person_name,
            email: req.email,
            username,
            phone_number: req.phone_number,
            password: req.password,
        })
        .await?;

    let response = issue_tokens(&state, &user).await?;
    Ok(Json(response))
}

/// GET /account/isEmailAlreadyRegistered?email=
///
/// Returns `true` when the email is NOT registered (i.e. available). The
/// polarity is part of the contract; clients depend on it.
pub async fn is_email_already_registered(
    State(state): State<ServerState>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<bool>> {
    let available = state.identity.is_email_available(&query.email).await?;
    Ok(Json(available))
}

/// POST /account/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthenticationResponse>> {
    let verified = state
        .identity
        .verify_credentials(&req.username, &req.password)
        .await?;

    // Fixed delay before acting on the result, whatever it was
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(user) = verified else {
        tracing::warn!(username = %req.username, "Login failed");
        return Err(AppError::invalid_credentials());
    };

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    let response = issue_tokens(&state, &user).await?;
    Ok(Json(response))
}

/// GET /account/logout
///
/// Always 204. When `revoke_refresh_token_on_logout` is enabled and the
/// caller presents a decodable access token, the stored refresh token is
/// dropped as well.
pub async fn logout(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    if state.config.revoke_refresh_token_on_logout
        && let Some(user_id) = user_id_from_headers(&state, &headers)
    {
        user_repo::clear_refresh_token(&state.pool, user_id).await?;
        tracing::info!(user_id = %user_id, "Refresh token revoked on logout");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /account/generateNewToken
///
/// Refresh protocol: recover the identity from the (possibly expired) access
/// token, match the supplied refresh token against the stored one, then
/// rotate. The rotation is guarded on the old token value, so one token
/// value rotates at most once.
pub async fn generate_new_token(
    State(state): State<ServerState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<AuthenticationResponse>> {
    let jwt_service = state.jwt_service();

    let claims = jwt_service
        .decode_allow_expired(&req.token)
        .map_err(|e| {
            tracing::warn!(error = %e, "Refresh rejected: access token did not decode");
            AppError::invalid("Invalid token")
        })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::invalid("Invalid token"))?;

    let user = state
        .identity
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::invalid("Invalid refresh token"))?;

    let stored_valid = user.refresh_token.as_deref() == Some(req.refresh_token.as_str())
        && user
            .refresh_token_expires_at
            .is_some_and(|exp| exp > Utc::now());
    if !stored_valid {
        tracing::warn!(user_id = %user.id, "Refresh rejected: token mismatch or expired");
        return Err(AppError::invalid("Invalid refresh token"));
    }

    let new_refresh = jwt_service.generate_refresh_token();
    let new_expiration = jwt_service.refresh_token_expiration();

    // First writer wins: a concurrent refresh with the same old token loses.
    let rotated = user_repo::rotate_refresh_token(
        &state.pool,
        user.id,
        &req.refresh_token,
        &new_refresh,
        new_expiration,
    )
    .await?;
    if !rotated {
        tracing::warn!(user_id = %user.id, "Refresh rejected: concurrent rotation");
        return Err(AppError::invalid("Invalid refresh token"));
    }

    let token = jwt_service
        .generate_token(&user.id.to_string(), &user.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    let expiration =
        Utc::now() + chrono::Duration::minutes(jwt_service.config.expiration_minutes);

    tracing::info!(user_id = %user.id, "Token pair rotated");

    Ok(Json(AuthenticationResponse {
        token,
        expiration,
        refresh_token: new_refresh,
        refresh_token_expiration: new_expiration,
    }))
}

// ========== Helpers ==========

/// Issue a fresh token pair and persist the refresh token on the user before
/// anything is returned to the client.
async fn issue_tokens(
    state: &ServerState,
    user: &User,
) -> Result<AuthenticationResponse, AppError> {
    let jwt_service = state.jwt_service();

    let token = jwt_service
        .generate_token(&user.id.to_string(), &user.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    let expiration =
        Utc::now() + chrono::Duration::minutes(jwt_service.config.expiration_minutes);

    let refresh_token = jwt_service.generate_refresh_token();
    let refresh_token_expiration = jwt_service.refresh_token_expiration();

    user_repo::set_refresh_token(&state.pool, user.id, &refresh_token, refresh_token_expiration)
        .await?;

    Ok(AuthenticationResponse {
        token,
        expiration,
        refresh_token,
        refresh_token_expiration,
    })
}

/// Best-effort identity extraction for logout: expired tokens still count,
/// anything else is ignored.
fn user_id_from_headers(state: &ServerState, headers: &HeaderMap) -> Option<Uuid> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let token = crate::auth::JwtService::extract_from_header(header)?;
    let claims = state.jwt_service().decode_allow_expired(token).ok()?;
    Uuid::parse_str(&claims.sub).ok()
}
