mod error;
mod jwt;
mod password;

pub mod model;
pub mod service;

// Re-export error types
pub use error::{AuthError, Result};

// Re-export crypto primitives
pub use jwt::{generate_token, validate_token, Claims};
pub use password::{hash_password, verify_password, DEFAULT_COST};

pub use model::User;
pub use service::AuthService;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AuthError, AuthService, Claims, Result, User};
}
