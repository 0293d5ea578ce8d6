//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{BusinessRegistrationResult, LoginOutput, Page, TokenScope};
use crate::domain::entity::{
    audit_log::AuditLog,
    business::Business,
    business_user::{BusinessUser, TeamMember},
    user::User,
};
use crate::domain::value_object::{
    audit_action::AuditAction, subscription_plan::SubscriptionPlan, system_role::SystemRole,
    tenant_role::TenantRole,
};

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl<T, U> From<Page<U>> for PageResponse<T>
where
    U: Into<T>,
{
    fn from(page: Page<U>) -> Self {
        let page = page.map(Into::into);
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total_count: page.total_count,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Paged listing narrowed by a name or email search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub scope: TokenScope,
    pub expires_at: DateTime<Utc>,
    pub user: LoginUserResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub system_role: SystemRole,
    pub business_id: Option<Uuid>,
    pub business_role: Option<TenantRole>,
}

impl From<LoginOutput> for LoginResponse {
    fn from(output: LoginOutput) -> Self {
        Self {
            access_token: output.access_token.token,
            token_type: "Bearer",
            scope: output.access_token.scope,
            expires_at: output.access_token.expires_at,
            user: LoginUserResponse {
                id: output.user_id.into_uuid(),
                full_name: output.full_name,
                email: output.email.to_string(),
                system_role: output.system_role,
                business_id: output.business_id.map(|id| id.into_uuid()),
                business_role: output.business_role,
            },
        }
    }
}

// ============================================================================
// Set / Change Password
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub user_id: Uuid,
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// Register Business
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBusinessRequest {
    pub business_name: String,
    pub business_email: String,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub owner_full_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBusinessResponse {
    pub business_id: Uuid,
    pub business_name: String,
    pub owner: OwnerSummary,
    pub email_sent: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<BusinessRegistrationResult> for RegisterBusinessResponse {
    fn from(result: BusinessRegistrationResult) -> Self {
        Self {
            business_id: result.business_id.into_uuid(),
            business_name: result.business_name,
            owner: OwnerSummary {
                user_id: result.owner_user_id.into_uuid(),
                full_name: result.owner_full_name,
                email: result.owner_email.to_string(),
            },
            email_sent: result.email_sent,
            message: result.message,
        }
    }
}

// ============================================================================
// Invite / Resend
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: TenantRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserResponse {
    pub user_id: Uuid,
    pub email_sent: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendCredentialsResponse {
    pub email_sent: bool,
    pub message: String,
}

// ============================================================================
// Team
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: TenantRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub joined_at: DateTime<Utc>,
}

impl From<TeamMember> for TeamMemberResponse {
    fn from(member: TeamMember) -> Self {
        Self {
            user_id: member.membership.user_id.into_uuid(),
            full_name: member.full_name,
            email: member.email.to_string(),
            role: member.membership.role,
            is_active: member.membership.is_active,
            is_verified: member.membership.is_verified,
            joined_at: member.membership.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub role: TenantRole,
    pub is_active: bool,
    pub is_verified: bool,
}

impl From<BusinessUser> for MembershipResponse {
    fn from(membership: BusinessUser) -> Self {
        Self {
            user_id: membership.user_id.into_uuid(),
            business_id: membership.business_id.into_uuid(),
            role: membership.role,
            is_active: membership.is_active,
            is_verified: membership.is_verified,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub activate: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: TenantRole,
}

// ============================================================================
// Business
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub subscription_plan: SubscriptionPlan,
    pub monthly_invoice_count: i32,
    pub is_multi_tenant: bool,
    pub brand_color: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Business> for BusinessResponse {
    fn from(business: Business) -> Self {
        Self {
            id: business.business_id.into_uuid(),
            name: business.name,
            email: business.email.to_string(),
            address: business.address,
            phone: business.phone,
            subscription_plan: business.plan,
            monthly_invoice_count: business.monthly_invoice_count,
            is_multi_tenant: business.is_multi_tenant,
            brand_color: business.brand_color,
            logo_url: business.logo_url,
            created_at: business.created_at,
        }
    }
}

// ============================================================================
// Users and profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub system_role: SystemRole,
    pub password_set: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.into_uuid(),
            full_name: user.full_name,
            email: user.email.to_string(),
            phone: user.phone,
            system_role: user.system_role,
            password_set: user.password_set,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub business_id: Option<Uuid>,
    pub business_role: Option<TenantRole>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub role: Option<SystemRole>,
}

// ============================================================================
// Audit Trail
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub action: AuditAction,
    pub entity_name: String,
    pub entity_id: Uuid,
    pub user_id: Uuid,
    pub business_id: Option<Uuid>,
    pub change_by: String,
    pub timestamp: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogResponse {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.audit_log_id.into_uuid(),
            action: log.action,
            entity_name: log.entity_name,
            entity_id: log.entity_id,
            user_id: log.user_id.into_uuid(),
            business_id: log.business_id.map(|id| id.into_uuid()),
            change_by: log.change_by,
            timestamp: log.timestamp,
        }
    }
}
