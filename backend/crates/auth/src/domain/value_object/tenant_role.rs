use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user inside one business.
///
/// `Owner` is assigned once, at registration, and is never granted,
/// changed, or suspended through team management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantRole {
    Owner,
    Admin,
    Member,
    Staff,
}

impl TenantRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use TenantRole::*;
        match self {
            Owner => "Owner",
            Admin => "Admin",
            Member => "Member",
            Staff => "Staff",
        }
    }

    /// Owner and Admin may invite members and reset their credentials.
    #[inline]
    pub const fn can_manage_team(&self) -> bool {
        matches!(self, TenantRole::Owner | TenantRole::Admin)
    }

    /// Roles that may be granted by invitation or role change.
    #[inline]
    pub const fn is_assignable(&self) -> bool {
        !matches!(self, TenantRole::Owner)
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use TenantRole::*;
        match code {
            "Owner" => Some(Owner),
            "Admin" => Some(Admin),
            "Member" => Some(Member),
            "Staff" => Some(Staff),
            _ => None,
        }
    }
}

impl fmt::Display for TenantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TenantRole {
    type Err = String;

    /// Case-insensitive, so `"member"` from a form is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [
            TenantRole::Owner,
            TenantRole::Admin,
            TenantRole::Member,
            TenantRole::Staff,
        ]
        .into_iter()
        .find(|role| role.code().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| format!("Invalid role: {s}"))
    }
}
