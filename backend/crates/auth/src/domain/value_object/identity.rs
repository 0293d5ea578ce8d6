//! Acting Identity
//!
//! Resolved once per request from the stored user and membership, then
//! passed into every tenant-scoped operation.

use super::ids::{BusinessId, MembershipId, UserId};
use super::system_role::SystemRole;
use super::tenant_role::TenantRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Platform administrator; no tenant context
    System { user_id: UserId, role: SystemRole },
    /// Active member of exactly one business
    Tenant {
        user_id: UserId,
        business_id: BusinessId,
        membership_id: MembershipId,
        role: TenantRole,
    },
}

impl Identity {
    pub fn user_id(&self) -> UserId {
        match self {
            Identity::System { user_id, .. } | Identity::Tenant { user_id, .. } => *user_id,
        }
    }

    pub fn business_id(&self) -> Option<BusinessId> {
        match self {
            Identity::System { .. } => None,
            Identity::Tenant { business_id, .. } => Some(*business_id),
        }
    }

    pub fn tenant_role(&self) -> Option<TenantRole> {
        match self {
            Identity::System { .. } => None,
            Identity::Tenant { role, .. } => Some(*role),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Identity::System { .. })
    }
}
