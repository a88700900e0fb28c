//! REST API layer

pub mod auth;
pub mod docs;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mapper;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
