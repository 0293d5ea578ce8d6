use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform-wide role, independent of any business membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum SystemRole {
    #[default]
    User = 0,
    Admin = 1,
    SuperAdmin = 2,
}

impl SystemRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use SystemRole::*;
        match self {
            User => "user",
            Admin => "admin",
            SuperAdmin => "super_admin",
        }
    }

    /// `admin` and `super_admin` bypass tenant membership entirely.
    #[inline]
    pub const fn is_platform_admin(&self) -> bool {
        matches!(self, SystemRole::Admin | SystemRole::SuperAdmin)
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use SystemRole::*;
        match code {
            "user" => Some(User),
            "admin" => Some(Admin),
            "super_admin" => Some(SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SystemRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("Invalid system role: {s}"))
    }
}
