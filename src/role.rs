use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability level attached to a request. The fronting auth layer owns
/// identity; this service only sees the resolved role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Guest,
    Member,
    Expert,
    Admin,
}

impl FromStr for Role {
    type Err = ();

    fn from_str(input: &str) -> Result<Role, Self::Err> {
        match input.to_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "member" => Ok(Role::Member),
            "expert" => Ok(Role::Expert),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Experts score constraint and attribute vectors.
pub fn can_score(role: Role) -> bool {
    role >= Role::Expert
}

/// Admins accept, delete, and promote projects into the reference set.
pub fn can_manage_projects(role: Role) -> bool {
    role >= Role::Admin
}
