//! Login Use Case
//!
//! Verifies credentials and issues either a system token (platform admins)
//! or a token scoped to the user's business membership.

use std::sync::Arc;

use crate::application::services::{AccessToken, AuthServices};
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::repository::{MembershipRepository, UserRepository};
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    email::Email,
    ids::{BusinessId, UserId},
    system_role::SystemRole,
    tenant_role::TenantRole,
    user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub access_token: AccessToken,
    pub user_id: UserId,
    pub full_name: String,
    pub email: Email,
    pub system_role: SystemRole,
    pub business_id: Option<BusinessId>,
    pub business_role: Option<TenantRole>,
}

pub struct LoginUseCase<S>
where
    S: UserRepository + MembershipRepository,
{
    store: Arc<S>,
    services: AuthServices,
}

impl<S> LoginUseCase<S>
where
    S: UserRepository + MembershipRepository,
{
    pub fn new(store: Arc<S>, services: AuthServices) -> Self {
        Self { store, services }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email =
            Email::new(&input.email).map_err(|_| AuthError::unauthorized(INVALID_CREDENTIALS))?;

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::unauthorized(INVALID_CREDENTIALS))?;

        // A password outside the policy can never match a stored hash
        let raw_password = RawPassword::new(input.password)
            .map_err(|_| AuthError::unauthorized(INVALID_CREDENTIALS))?;

        let password_valid = user
            .password
            .as_ref()
            .is_some_and(|hash| hash.verify(&raw_password, &self.services.hasher));
        if !password_valid {
            tracing::warn!(user_id = %user.user_id, "Failed login attempt");
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        }

        if user.is_platform_admin() {
            let access_token = self.services.tokens.issue_system(&user)?;
            tracing::info!(user_id = %user.user_id, role = %user.system_role, "System login");

            return Ok(LoginOutput {
                access_token,
                user_id: user.user_id,
                full_name: user.full_name,
                email: user.email,
                system_role: user.system_role,
                business_id: None,
                business_role: None,
            });
        }

        let mut membership = self
            .store
            .find_active_membership_by_user(&user.user_id)
            .await?
            .ok_or_else(|| AuthError::unauthorized("Business access denied"))?;

        if !membership.is_active {
            return Err(AuthError::unauthorized("Your account has been suspended"));
        }

        if membership.mark_verified() {
            let audit = AuditLog::new(
                AuditAction::VerifyUser,
                audit_entity::BUSINESS_USER,
                membership.membership_id,
                user.user_id,
                Some(membership.business_id),
                user.email.as_str(),
            );
            self.store.update_membership(&membership, &audit).await?;
            tracing::info!(user_id = %user.user_id, "Membership verified on first login");
        }

        let access_token = self.services.tokens.issue_tenant(&user, &membership)?;

        tracing::info!(
            user_id = %user.user_id,
            business_id = %membership.business_id,
            role = %membership.role,
            "Tenant login"
        );

        Ok(LoginOutput {
            access_token,
            user_id: user.user_id,
            full_name: user.full_name,
            email: user.email,
            system_role: user.system_role,
            business_id: Some(membership.business_id),
            business_role: Some(membership.role),
        })
    }
}
