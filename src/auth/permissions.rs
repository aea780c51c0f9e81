use std::collections::{HashMap, HashSet};
use std::fmt;

/// Atomic capabilities checked by the authentication gate.
///
/// Permissions are compile-time constants, never persisted. The wire form
/// is the SCREAMING_SNAKE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    UserCreate,
    UserRead,
    UserUpdate,
    UserDelete,
    ItemCreate,
    ItemRead,
    ItemUpdate,
    ItemDelete,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::UserCreate,
        Permission::UserRead,
        Permission::UserUpdate,
        Permission::UserDelete,
        Permission::ItemCreate,
        Permission::ItemRead,
        Permission::ItemUpdate,
        Permission::ItemDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UserCreate => "USER_CREATE",
            Permission::UserRead => "USER_READ",
            Permission::UserUpdate => "USER_UPDATE",
            Permission::UserDelete => "USER_DELETE",
            Permission::ItemCreate => "ITEM_CREATE",
            Permission::ItemRead => "ITEM_READ",
            Permission::ItemUpdate => "ITEM_UPDATE",
            Permission::ItemDelete => "ITEM_DELETE",
        }
    }

    pub fn parse(name: &str) -> Option<Permission> {
        Permission::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of roles a user can hold.
///
/// Roles are persisted by name in the `roles` table; `as_str`/`parse` are
/// the bidirectional mapping between the enum and the stored string.
/// Parsing an unknown name fails, which startup validation turns into a
/// hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    SystemAdmin,
    LocationAdmin,
    LocationOperator,
}

impl RoleKind {
    pub const ALL: [RoleKind; 3] = [
        RoleKind::SystemAdmin,
        RoleKind::LocationAdmin,
        RoleKind::LocationOperator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::SystemAdmin => "SYSTEM_ADMIN",
            RoleKind::LocationAdmin => "LOCATION_ADMIN",
            RoleKind::LocationOperator => "LOCATION_OPERATOR",
        }
    }

    pub fn parse(name: &str) -> Option<RoleKind> {
        RoleKind::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable role-to-permission table.
///
/// Built once at startup and shared by `Arc`; nothing mutates it afterwards.
/// Authorization is plain set arithmetic: a user's granted set is the union
/// of their roles' entries, and a request passes when the required
/// permissions are a subset of the granted set.
pub struct PermissionRegistry {
    grants: HashMap<RoleKind, HashSet<Permission>>,
}

impl PermissionRegistry {
    pub fn new(grants: HashMap<RoleKind, HashSet<Permission>>) -> Self {
        Self { grants }
    }

    /// The production registry: every compiled role has an entry.
    pub fn builtin() -> Self {
        use Permission::*;

        let mut grants = HashMap::new();
        grants.insert(RoleKind::SystemAdmin, HashSet::from(Permission::ALL));
        grants.insert(
            RoleKind::LocationAdmin,
            HashSet::from([UserRead, UserUpdate, ItemCreate, ItemRead, ItemUpdate, ItemDelete]),
        );
        grants.insert(
            RoleKind::LocationOperator,
            HashSet::from([ItemCreate, ItemRead, ItemUpdate, ItemDelete]),
        );

        Self::new(grants)
    }

    /// Permissions granted by a single role.
    ///
    /// A role without an entry grants nothing. That is a registry
    /// misconfiguration, so it is logged, but it fails closed rather than
    /// failing the request.
    pub fn permissions_of(&self, role: RoleKind) -> HashSet<Permission> {
        match self.grants.get(&role) {
            Some(permissions) => permissions.clone(),
            None => {
                tracing::warn!(role = %role, "role has no registry entry, granting nothing");
                HashSet::new()
            }
        }
    }

    /// Union of the permission sets of all given roles.
    pub fn granted_to(&self, roles: &[RoleKind]) -> HashSet<Permission> {
        let mut granted = HashSet::new();
        for role in roles {
            granted.extend(self.permissions_of(*role));
        }
        granted
    }

    /// Whether the given roles collectively grant every required permission.
    ///
    /// An empty `required` slice always authorizes.
    pub fn authorizes(&self, roles: &[RoleKind], required: &[Permission]) -> bool {
        let granted = self.granted_to(roles);
        required.iter().all(|p| granted.contains(p))
    }
}
