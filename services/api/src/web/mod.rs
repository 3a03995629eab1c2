pub mod auth;
pub mod middleware;
pub mod news;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder to make it easily accessible
// to the binary and the integration tests.
pub use middleware::require_auth;
pub use router::build_router;
pub use state::AppState;
