//! Permission vocabulary and role model.
//!
//! Permissions travel over the wire as snake_case strings but are stored
//! internally as an enum backed by a bitset, so membership checks are a
//! single mask test instead of a string scan.

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A capability tag from the closed permission vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    MeshNodeCreate,
    MeshNodeRead,
    MeshNodeUpdate,
    MeshNodeDelete,

    MeshNodeUpdateCreate,
    MeshNodeUpdateRead,
    MeshNodeUpdateDelete,

    DataCreate,
    DataRead,
    DataDelete,

    UserAccountCreate,
    UserAccountRead,
    UserAccountUpdate,
    UserAccountDelete,

    ServiceAccountCreate,
    ServiceAccountRead,
    ServiceAccountUpdate,
    ServiceAccountDelete,

    RoleCreate,
    RoleRead,
    RoleUpdate,
    RoleDelete,

    AreaRead,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 23] = [
        Permission::MeshNodeCreate,
        Permission::MeshNodeRead,
        Permission::MeshNodeUpdate,
        Permission::MeshNodeDelete,
        Permission::MeshNodeUpdateCreate,
        Permission::MeshNodeUpdateRead,
        Permission::MeshNodeUpdateDelete,
        Permission::DataCreate,
        Permission::DataRead,
        Permission::DataDelete,
        Permission::UserAccountCreate,
        Permission::UserAccountRead,
        Permission::UserAccountUpdate,
        Permission::UserAccountDelete,
        Permission::ServiceAccountCreate,
        Permission::ServiceAccountRead,
        Permission::ServiceAccountUpdate,
        Permission::ServiceAccountDelete,
        Permission::RoleCreate,
        Permission::RoleRead,
        Permission::RoleUpdate,
        Permission::RoleDelete,
        Permission::AreaRead,
    ];

    /// The wire name of this permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::MeshNodeCreate => "mesh_node_create",
            Permission::MeshNodeRead => "mesh_node_read",
            Permission::MeshNodeUpdate => "mesh_node_update",
            Permission::MeshNodeDelete => "mesh_node_delete",
            Permission::MeshNodeUpdateCreate => "mesh_node_update_create",
            Permission::MeshNodeUpdateRead => "mesh_node_update_read",
            Permission::MeshNodeUpdateDelete => "mesh_node_update_delete",
            Permission::DataCreate => "data_create",
            Permission::DataRead => "data_read",
            Permission::DataDelete => "data_delete",
            Permission::UserAccountCreate => "user_account_create",
            Permission::UserAccountRead => "user_account_read",
            Permission::UserAccountUpdate => "user_account_update",
            Permission::UserAccountDelete => "user_account_delete",
            Permission::ServiceAccountCreate => "service_account_create",
            Permission::ServiceAccountRead => "service_account_read",
            Permission::ServiceAccountUpdate => "service_account_update",
            Permission::ServiceAccountDelete => "service_account_delete",
            Permission::RoleCreate => "role_create",
            Permission::RoleRead => "role_read",
            Permission::RoleUpdate => "role_update",
            Permission::RoleDelete => "role_delete",
            Permission::AreaRead => "area_read",
        }
    }

    /// Look up a permission by its wire name.
    ///
    /// Returns `None` for anything outside the vocabulary; matching is exact.
    pub fn from_name(name: &str) -> Option<Permission> {
        Permission::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::from_name(s).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// Error for a string outside the permission vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown permission {}", self.0)
    }
}

impl std::error::Error for UnknownPermission {}

/// An unordered set of permissions.
///
/// Inserting a permission twice is a no-op; membership is O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionSet(u32);

impl PermissionSet {
    /// The empty set.
    pub const EMPTY: PermissionSet = PermissionSet(0);

    /// Build a set from a slice of permissions.
    pub fn of(permissions: &[Permission]) -> Self {
        permissions.iter().copied().collect()
    }

    /// Add a permission to the set.
    pub fn insert(&mut self, permission: Permission) {
        self.0 |= permission.bit();
    }

    /// Whether the set contains the given permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    /// Whether every permission in `required` is present.
    pub fn contains_all(&self, required: PermissionSet) -> bool {
        self.0 & required.0 == required.0
    }

    /// The first permission in `required` that is not present, if any.
    pub fn first_missing(&self, required: PermissionSet) -> Option<Permission> {
        required.iter().find(|p| !self.contains(*p))
    }

    /// Iterate over the members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        let set = *self;
        Permission::ALL.iter().copied().filter(move |p| set.contains(*p))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = PermissionSet::EMPTY;
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut set = PermissionSet::EMPTY;
        for name in names {
            let p = Permission::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown permission {name}")))?;
            set.insert(p);
        }
        Ok(set)
    }
}

/// A named bundle of permissions assigned to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub permissions: PermissionSet,
}
