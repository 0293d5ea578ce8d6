//! Invite Business User Use Case
//!
//! An owner or admin adds a member to their own business. The new user
//! receives a set-password link.

use std::sync::Arc;

use crate::application::access_guard::Actor;
use crate::application::services::AuthServices;
use crate::application::set_password_link::{self, record_delivery, send_set_password_link};
use crate::domain::entity::{business_user::BusinessUser, user::User};
use crate::domain::notification::{NotificationGateway, SetPasswordEmailKind};
use crate::domain::repository::{BusinessRepository, CredentialStore, UserRepository};
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    email::Email,
    identity::Identity,
    ids::UserId,
    system_role::SystemRole,
    tenant_role::TenantRole,
};
use crate::error::{AuthError, AuthResult};

/// Invite input
pub struct InviteUserInput {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: TenantRole,
}

/// Invite output
#[derive(Debug, Clone)]
pub struct InviteUserOutput {
    pub user_id: UserId,
    pub email_sent: bool,
}

pub struct InviteUserUseCase<S, N>
where
    S: UserRepository + BusinessRepository + CredentialStore,
    N: NotificationGateway,
{
    store: Arc<S>,
    gateway: Arc<N>,
    services: AuthServices,
}

impl<S, N> InviteUserUseCase<S, N>
where
    S: UserRepository + BusinessRepository + CredentialStore,
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
        inviter: &Actor,
        input: InviteUserInput,
    ) -> AuthResult<InviteUserOutput> {
        let Identity::Tenant {
            business_id, role, ..
        } = inviter.identity
        else {
            return Err(AuthError::unauthorized("Business access denied"));
        };

        if !role.can_manage_team() {
            return Err(AuthError::unauthorized(
                "Only owners and admins can invite users",
            ));
        }

        if !input.role.is_assignable() {
            return Err(AuthError::invalid_operation(
                "Invited users can only be Admin, Member, or Staff",
            ));
        }

        if input.full_name.trim().is_empty() {
            return Err(AuthError::BadRequest("Full name is required".into()));
        }

        let email = Email::new(&input.email)?;
        if self.store.user_email_exists(&email).await? {
            return Err(AuthError::conflict("A user with this email already exists"));
        }

        let business = self
            .store
            .find_business_by_id(&business_id)
            .await?
            .ok_or_else(|| AuthError::unauthorized("Business access denied"))?;

        let mut user = User::new(input.full_name, email, input.phone, SystemRole::User);
        let membership = BusinessUser::new(business_id, user.user_id, input.role);
        let link = set_password_link::prepare(&self.services, &mut user)?;

        let audit = inviter.audit(
            AuditAction::Invite,
            audit_entity::USER,
            user.user_id,
            Some(business_id),
        );

        self.store.add_member(&user, &membership, &audit).await?;

        tracing::info!(
            user_id = %user.user_id,
            business_id = %business_id,
            role = %input.role,
            inviter_id = %inviter.user_id(),
            "User invited"
        );

        let email_sent = send_set_password_link(
            self.gateway.as_ref(),
            &user,
            &business.name,
            &link,
            SetPasswordEmailKind::Invitation,
        )
        .await;
        record_delivery(self.store.as_ref(), &mut user, email_sent, &audit).await;

        Ok(InviteUserOutput {
            user_id: user.user_id,
            email_sent,
        })
    }
}
