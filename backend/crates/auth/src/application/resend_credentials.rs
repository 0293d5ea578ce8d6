//! Resend Business Credentials Use Case
//!
//! Re-issues a set-password link to a member. Guarded by the abuse guard
//! before anything is read or written.

use chrono::Utc;
use std::sync::Arc;

use crate::application::abuse_guard::check_resend_allowed;
use crate::application::access_guard::{Actor, ensure_can_reset_password};
use crate::application::services::AuthServices;
use crate::application::set_password_link::{self, record_delivery, send_set_password_link};
use crate::domain::notification::{NotificationGateway, SetPasswordEmailKind};
use crate::domain::repository::{
    BusinessRepository, MembershipRepository, RateLimitLedger, UserRepository,
};
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    ids::UserId,
};
use crate::error::{AuthError, AuthResult};

/// Resend output
#[derive(Debug, Clone)]
pub struct ResendCredentialsOutput {
    pub email_sent: bool,
}

pub struct ResendCredentialsUseCase<S, N>
where
    S: UserRepository + BusinessRepository + MembershipRepository + RateLimitLedger,
    N: NotificationGateway,
{
    store: Arc<S>,
    gateway: Arc<N>,
    services: AuthServices,
}

impl<S, N> ResendCredentialsUseCase<S, N>
where
    S: UserRepository + BusinessRepository + MembershipRepository + RateLimitLedger,
    N: NotificationGateway,
{
    pub fn new(store: Arc<S>, gateway: Arc<N>, services: AuthServices) -> Self {
        Self {
            store,
            gateway,
            services,
        }
    }

    pub async fn execute(
        &self,
        admin: &Actor,
        target_user_id: UserId,
    ) -> AuthResult<ResendCredentialsOutput> {
        check_resend_allowed(
            self.store.as_ref(),
            &self.services.config.resend_policy,
            admin.user_id(),
            target_user_id,
            Utc::now(),
        )
        .await?;

        let membership = self
            .store
            .find_membership_by_user(&target_user_id)
            .await?
            .ok_or_else(|| AuthError::not_found("Business user not found"))?;

        ensure_can_reset_password(&admin.identity, &membership)?;

        let mut user = self
            .store
            .find_user_by_id(&target_user_id)
            .await?
            .ok_or_else(|| AuthError::not_found("Business user not found"))?;
        let business = self
            .store
            .find_business_by_id(&membership.business_id)
            .await?
            .ok_or_else(|| AuthError::not_found("Business not found"))?;

        let link = set_password_link::prepare(&self.services, &mut user)?;
        let audit = admin.audit(
            AuditAction::ResetPasswordLink,
            audit_entity::USER,
            user.user_id,
            Some(business.business_id),
        );
        self.store.update_user(&user, &audit).await?;

        tracing::info!(
            user_id = %user.user_id,
            admin_id = %admin.user_id(),
            "Credentials reissued"
        );

        let email_sent = send_set_password_link(
            self.gateway.as_ref(),
            &user,
            &business.name,
            &link,
            SetPasswordEmailKind::Reset,
        )
        .await;
        record_delivery(self.store.as_ref(), &mut user, email_sent, &audit).await;

        Ok(ResendCredentialsOutput { email_sent })
    }
}
