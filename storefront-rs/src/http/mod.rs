//! HTTP layer: Axum router, handlers, and responses.
//!
//! Exposes the session endpoints (`/api/auth/*`), the admin pricing-plan
//! listing, and the per-user order history.

mod auth;
mod error;
mod handlers;
mod responses;
mod state;


pub use handlers::router;
pub use state::{AppState, SessionStore};
