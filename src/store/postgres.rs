//! Postgres-backed credential and role stores.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;

use crate::auth::{PasswordRecord, Permission, PermissionSet, Role};
use crate::config::DatabaseConfig;

use super::{CredentialStore, RoleStore, StoreError};

/// Credential and role store over a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool using the database configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }

    async fn role_by_account(&self, query: &str, id: u64) -> Result<Role, StoreError> {
        let row = sqlx::query(query)
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        role_from_row(&row)
    }
}

fn role_from_row(row: &PgRow) -> Result<Role, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    let names: Vec<String> = row
        .try_get("permissions")
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

    let mut permissions = PermissionSet::EMPTY;
    for name in &names {
        match Permission::from_name(name) {
            Some(p) => permissions.insert(p),
            // The permission column is a closed database enum; a value we
            // cannot map means the binary is older than the schema.
            None => tracing::warn!("ignoring unknown permission {name} from store"),
        }
    }

    Ok(Role {
        id: id as u64,
        name,
        permissions,
    })
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn user_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<(u64, PasswordRecord), StoreError> {
        let row = sqlx::query(
            "SELECT id, password, salt
             FROM user_account
             WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let hash: Vec<u8> = row
            .try_get("password")
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let salt: Vec<u8> = row
            .try_get("salt")
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok((id as u64, PasswordRecord { hash, salt }))
    }
}

#[async_trait]
impl RoleStore for PgStore {
    async fn role_by_user_id(&self, id: u64) -> Result<Role, StoreError> {
        self.role_by_account(
            "SELECT r.id, r.name, array_agg(rp.permission::text) AS permissions
             FROM role r
             JOIN role_permission rp ON r.id = rp.role_id
             JOIN user_account ua ON r.id = ua.role_id
             WHERE ua.id = $1
             GROUP BY r.id, r.name",
            id,
        )
        .await
    }

    async fn role_by_service_id(&self, id: u64) -> Result<Role, StoreError> {
        self.role_by_account(
            "SELECT r.id, r.name, array_agg(rp.permission::text) AS permissions
             FROM role r
             JOIN role_permission rp ON r.id = rp.role_id
             JOIN service_account sa ON r.id = sa.role_id
             WHERE sa.id = $1
             GROUP BY r.id, r.name",
            id,
        )
        .await
    }
}
