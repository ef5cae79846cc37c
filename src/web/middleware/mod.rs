//! Middleware for the web API.

pub mod auth;
pub mod cors;
pub mod gate;

pub use auth::{authorize, AUTH_COOKIE};
pub use cors::create_cors_layer;
pub use gate::permission_gate;
