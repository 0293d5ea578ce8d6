use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubscriptionPlan {
    /// Capped monthly invoice count
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl SubscriptionPlan {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "Free",
            SubscriptionPlan::Pro => "Pro",
            SubscriptionPlan::Enterprise => "Enterprise",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Free" => Some(SubscriptionPlan::Free),
            "Pro" => Some(SubscriptionPlan::Pro),
            "Enterprise" => Some(SubscriptionPlan::Enterprise),
            _ => None,
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
