//! HTTP API module for the local train status service.

pub mod handlers;
pub mod routes;

pub use handlers::{report_response, AppState};
pub use routes::create_router;
