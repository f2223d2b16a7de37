//! Application services.

pub mod identity;

pub use identity::{IdentityService, Registration};
