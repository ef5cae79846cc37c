//! meshmon - backend for a mesh sensor network monitoring platform.
//!
//! The heart of the crate is the authentication and authorization
//! subsystem: Argon2id credential verification, HMAC-signed session
//! tokens, per-request role resolution, and per-route permission gates.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod web;

pub use auth::{
    AccountInfo, AuthError, Claims, HashParams, PasswordHasher, PasswordRecord, Permission,
    PermissionSet, Principal, Role, SignedToken, TokenCodec,
};
pub use config::Config;
pub use error::{MeshmonError, Result};
pub use web::WebServer;
