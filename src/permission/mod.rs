//! Permission gate
//!
//! One request per capability. Callers always re-request; nothing here
//! remembers an earlier answer.

pub mod desktop;

pub use desktop::DesktopPermissions;

use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Camera,
    Location,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Camera => write!(f, "camera"),
            Capability::Location => write!(f, "location"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Turned off by a system-wide policy the user has to change elsewhere
    Blocked,
    /// The capability does not exist on this machine
    Unavailable,
    Restricted,
}

impl PermissionStatus {
    /// Only an explicit grant counts; every other status is a refusal
    pub fn is_granted(&self) -> bool {
        *self == PermissionStatus::Granted
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::Blocked => write!(f, "blocked"),
            PermissionStatus::Unavailable => write!(f, "unavailable"),
            PermissionStatus::Restricted => write!(f, "restricted"),
        }
    }
}

pub trait PermissionService {
    fn request(&self, capability: Capability) -> LocalBoxFuture<'_, PermissionStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_granted_is_success() {
        assert!(PermissionStatus::Granted.is_granted());
        for status in [
            PermissionStatus::Denied,
            PermissionStatus::Blocked,
            PermissionStatus::Unavailable,
            PermissionStatus::Restricted,
        ] {
            assert!(!status.is_granted(), "{} must not count as granted", status);
        }
    }
}
