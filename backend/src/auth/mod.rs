//! Authentication and authorization
//!
//! Session tokens (signed, 30-day validity), argon2 password hashing and
//! the role gate applied before any catalog mutation.

mod middleware;
mod password;
mod rbac;
mod token;

pub use middleware::AuthUser;
pub use password::PasswordService;
pub use rbac::authorize;
pub use token::TokenService;
