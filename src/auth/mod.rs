// Authorization layer - role registry and the request gate

pub mod gate;
pub mod permissions;

pub use gate::AuthGate;
pub use permissions::{Permission, PermissionRegistry, RoleKind};
