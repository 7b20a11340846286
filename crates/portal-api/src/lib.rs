//! # Portal API
//! 
//! HTTP handlers, extractors, error mapping, and the router.

pub mod handlers;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
