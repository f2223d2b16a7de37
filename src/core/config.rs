//! Server configuration

use crate::auth::{JwtConfig, PasswordPolicy};

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_path: String,
    pub environment: String,
    pub jwt: JwtConfig,
    pub password_min_length: usize,
    /// Logout does not revoke the stored refresh token by default, matching
    /// the historical behavior. Flip this to harden logout; the refresh flow
    /// then rejects tokens issued before the logout.
    pub revoke_refresh_token_on_logout: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "orders.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::default(),
            password_min_length: std::env::var("PASSWORD_MIN_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            revoke_refresh_token_on_logout: std::env::var("REVOKE_REFRESH_TOKEN_ON_LOGOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.password_min_length,
            ..PasswordPolicy::default()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
