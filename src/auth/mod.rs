//! Authentication and authorization core.
//!
//! Password hashing, signed session tokens, the principal/permission
//! model, and the shared error taxonomy. The HTTP-facing pieces live in
//! `crate::web`.

pub mod error;
pub mod password;
pub mod permission;
pub mod principal;
pub mod token;

pub use error::AuthError;
pub use password::{HashParams, PasswordHasher, PasswordRecord};
pub use permission::{Permission, PermissionSet, Role, UnknownPermission};
pub use principal::{AccountInfo, Claims, Principal};
pub use token::{SignedToken, TokenCodec};
