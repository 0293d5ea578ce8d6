//! Business membership
//!
//! Binds one user to one business with a tenant role. Authorization for
//! every tenant-scoped operation is resolved through this row.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email,
    ids::{BusinessId, MembershipId, UserId},
    tenant_role::TenantRole,
};

#[derive(Debug, Clone)]
pub struct BusinessUser {
    pub membership_id: MembershipId,
    pub business_id: BusinessId,
    pub user_id: UserId,
    pub role: TenantRole,
    /// `false` means suspended
    pub is_active: bool,
    /// Set on first successful login, never cleared
    pub is_verified: bool,
    pub is_deleted: bool,
    pub joined_at: DateTime<Utc>,
}

impl BusinessUser {
    /// Active, unverified membership
    pub fn new(business_id: BusinessId, user_id: UserId, role: TenantRole) -> Self {
        Self {
            membership_id: MembershipId::new(),
            business_id,
            user_id,
            role,
            is_active: true,
            is_verified: false,
            is_deleted: false,
            joined_at: Utc::now(),
        }
    }

    /// Returns `true` if this call flipped the flag
    pub fn mark_verified(&mut self) -> bool {
        if self.is_verified {
            return false;
        }
        self.is_verified = true;
        true
    }

    pub fn is_owner(&self) -> bool {
        self.role == TenantRole::Owner
    }
}

/// Membership joined with the member's profile, for team listings
#[derive(Debug, Clone)]
pub struct TeamMember {
    pub membership: BusinessUser,
    pub full_name: String,
    pub email: Email,
}
