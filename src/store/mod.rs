//! External credential and role stores.
//!
//! The web layer only sees these traits; `PgStore` is the Postgres
//! implementation. The stores own their own consistency guarantees, so
//! nothing here takes in-process locks.

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::{PasswordRecord, Role};

pub use postgres::PgStore;

/// Store access failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// The store could not be reached or returned a malformed row.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Looks up stored password material for login.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The user id and password record for a username, if the user exists.
    async fn user_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<(u64, PasswordRecord), StoreError>;
}

/// Resolves the current role of a principal.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn role_by_user_id(&self, id: u64) -> Result<Role, StoreError>;

    async fn role_by_service_id(&self, id: u64) -> Result<Role, StoreError>;
}
