//! Orders Web API
//!
//! CRUD service for orders and order line items with JWT authentication and
//! refresh-token rotation.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/      # configuration, state, server lifecycle
//! ├── auth/      # JWT, password hashing/policy, auth middleware
//! ├── services/  # identity (account management)
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # SQLite pool, models, repositories
//! └── utils/     # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
