//! Authentication: JWT issuance/validation, password hashing, middleware.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use password::{PasswordPolicy, hash_password, verify_password};
