pub mod admin_handlers;
pub mod auth_handlers;
pub mod health_handlers;
pub mod join_handlers;
pub mod opportunity_handlers;

pub use health_handlers::{health_check, health_check_simple, liveness_check};
