//! Shared helpers for web API tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;

use meshmon::auth::{HashParams, PasswordHasher, PasswordRecord, Permission, PermissionSet, Role};
use meshmon::config::AuthConfig;
use meshmon::store::{CredentialStore, RoleStore, StoreError};
use meshmon::web::handlers::AppState;
use meshmon::web::router::create_router;

/// Hasher with small cost parameters so the suite stays fast.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(test_hash_params())
}

pub fn test_hash_params() -> HashParams {
    HashParams {
        salt_len: 16,
        output_len: 32,
        time_cost: 1,
        memory_kib: 16,
        parallelism: 1,
    }
}

/// Auth configuration for tests.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        issuer: "meshmon-test".to_string(),
        leeway_secs: 5,
        session_ttl_hours: 24,
        service_ttl_days: 365,
        argon2: test_hash_params(),
    }
}

pub fn role(id: u64, name: &str, permissions: &[Permission]) -> Role {
    Role {
        id,
        name: name.to_string(),
        permissions: PermissionSet::of(permissions),
    }
}

/// In-memory credential and role store.
#[derive(Default)]
pub struct MemoryStore {
    users: HashMap<String, (u64, PasswordRecord)>,
    user_roles: HashMap<u64, Role>,
    service_roles: HashMap<u64, Role>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with a hashed password and an optional role.
    pub fn add_user(&mut self, id: u64, username: &str, password: &str, role: Option<Role>) {
        let record = test_hasher().hash(password).unwrap();
        self.users.insert(username.to_string(), (id, record));
        if let Some(role) = role {
            self.user_roles.insert(id, role);
        }
    }

    pub fn add_service(&mut self, id: u64, role: Role) {
        self.service_roles.insert(id, role);
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn user_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<(u64, PasswordRecord), StoreError> {
        self.users.get(username).cloned().ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn role_by_user_id(&self, id: u64) -> Result<Role, StoreError> {
        self.user_roles.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn role_by_service_id(&self, id: u64) -> Result<Role, StoreError> {
        self.service_roles.get(&id).cloned().ok_or(StoreError::NotFound)
    }
}

/// Build a test server over the API router with the given store.
pub fn create_test_server(store: MemoryStore) -> TestServer {
    let store = Arc::new(store);
    let state = Arc::new(AppState::new(&test_auth_config(), store.clone(), store));
    let router = create_router(state, &[]);
    TestServer::new(router).expect("Failed to create test server")
}
