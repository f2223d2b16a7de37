//! Shared utilities: errors, logging, validation.

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult, Problem};
