//! HTTP API handlers for mcb-ui

pub mod auth;
pub mod browse;
pub mod health;
pub mod search;

pub use auth::{auth_middleware, AuthedUser};
pub use browse::{browse_more, browse_select, browse_state};
pub use health::health_routes;
pub use search::search;
