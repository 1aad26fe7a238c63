pub mod handlers;
pub mod rate_limit;

pub use handlers::{AppState, router};
pub use rate_limit::RateLimitLayer;
