pub mod employee_handlers;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod schemas;
pub mod state;
pub mod user_handlers;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use router::router;
pub use state::AppState;
