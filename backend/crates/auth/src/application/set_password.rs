//! Set Password Use Case
//!
//! Redeems a set-password token. Tokens are single use: success clears the
//! stored hash and expiry in the same commit that stores the password.

use chrono::Utc;
use std::sync::Arc;

use crate::application::services::AuthServices;
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::repository::{MembershipRepository, UserRepository};
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    ids::UserId,
    set_password_token::SetPasswordToken,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Set password input
pub struct SetPasswordInput {
    pub user_id: UserId,
    pub token: String,
    pub new_password: String,
}

pub struct SetPasswordUseCase<S>
where
    S: UserRepository + MembershipRepository,
{
    store: Arc<S>,
    services: AuthServices,
}

impl<S> SetPasswordUseCase<S>
where
    S: UserRepository + MembershipRepository,
{
    pub fn new(store: Arc<S>, services: AuthServices) -> Self {
        Self { store, services }
    }

    pub async fn execute(&self, input: SetPasswordInput) -> AuthResult<()> {
        let invalid = || AuthError::unauthorized("Set-password link is invalid or already used");

        let mut user = self
            .store
            .find_user_by_id(&input.user_id)
            .await?
            .ok_or_else(invalid)?;

        let (hash, expires_at) = user.pending_reset_token().ok_or_else(invalid)?;

        if expires_at < Utc::now() {
            return Err(AuthError::unauthorized("Set-password link has expired"));
        }

        let token = SetPasswordToken::from_raw(input.token);
        if !token.matches(hash, &self.services.hasher) {
            tracing::warn!(user_id = %user.user_id, "Set-password token mismatch");
            return Err(invalid());
        }

        let raw_password = RawPassword::new(input.new_password)?;
        let password = UserPassword::from_raw(&raw_password, &self.services.hasher)?;
        user.set_password(password);

        let business_id = self
            .store
            .find_membership_by_user(&user.user_id)
            .await?
            .map(|membership| membership.business_id);
        let audit = AuditLog::new(
            AuditAction::SetPassword,
            audit_entity::USER,
            user.user_id,
            user.user_id,
            business_id,
            user.email.as_str(),
        );
        self.store.update_user(&user, &audit).await?;

        tracing::info!(user_id = %user.user_id, "Password set");
        Ok(())
    }
}
