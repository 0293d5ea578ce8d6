//! Register Business Use Case
//!
//! A platform administrator creates a business together with its owner.
//! The owner gets no password; a set-password link is emailed instead.

use std::sync::Arc;

use crate::application::access_guard::Actor;
use crate::application::services::AuthServices;
use crate::application::set_password_link::{self, record_delivery, send_set_password_link};
use crate::domain::entity::{business::Business, business_user::BusinessUser, user::User};
use crate::domain::notification::{NotificationGateway, SetPasswordEmailKind};
use crate::domain::repository::{BusinessRepository, CredentialStore, UserRepository};
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    email::Email,
    ids::{BusinessId, UserId},
    system_role::SystemRole,
    tenant_role::TenantRole,
};
use crate::error::{AuthError, AuthResult};

/// Register business input
pub struct RegisterBusinessInput {
    pub business_name: String,
    pub business_email: String,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub owner_full_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}

/// Register business output
#[derive(Debug, Clone)]
pub struct BusinessRegistrationResult {
    pub business_id: BusinessId,
    pub business_name: String,
    pub owner_user_id: UserId,
    pub owner_full_name: String,
    pub owner_email: Email,
    pub email_sent: bool,
    pub message: String,
}

pub struct RegisterBusinessUseCase<S, N>
where
    S: UserRepository + BusinessRepository + CredentialStore,
    N: NotificationGateway,
{
    store: Arc<S>,
    gateway: Arc<N>,
    services: AuthServices,
}

impl<S, N> RegisterBusinessUseCase<S, N>
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
        registrar: &Actor,
        input: RegisterBusinessInput,
    ) -> AuthResult<BusinessRegistrationResult> {
        if !registrar.identity.is_system() {
            return Err(AuthError::unauthorized(
                "Only platform administrators can register businesses",
            ));
        }

        let business_name = input.business_name.trim().to_string();
        if business_name.is_empty() {
            return Err(AuthError::BadRequest("Business name is required".into()));
        }
        if input.owner_full_name.trim().is_empty() {
            return Err(AuthError::BadRequest("Owner name is required".into()));
        }

        let owner_email = Email::new(&input.owner_email)?;
        let business_email = Email::new(&input.business_email)?;

        if self.store.user_email_exists(&owner_email).await? {
            return Err(AuthError::conflict("A user with this email already exists"));
        }
        if self.store.business_name_exists(&business_name).await? {
            return Err(AuthError::conflict("A business with this name already exists"));
        }

        let business = Business::new(
            business_name,
            business_email,
            input.business_address,
            input.business_phone,
        );
        let mut owner = User::new(
            input.owner_full_name,
            owner_email,
            input.owner_phone,
            SystemRole::User,
        );
        let membership = BusinessUser::new(business.business_id, owner.user_id, TenantRole::Owner);
        let link = set_password_link::prepare(&self.services, &mut owner)?;

        let audit = registrar.audit(
            AuditAction::CreateBusiness,
            audit_entity::BUSINESS,
            business.business_id,
            Some(business.business_id),
        );

        // Check-then-insert race: the store maps unique violations to Conflict
        self.store
            .register_business(&business, &owner, &membership, &audit)
            .await?;

        tracing::info!(
            business_id = %business.business_id,
            owner_id = %owner.user_id,
            registrar_id = %registrar.user_id(),
            "Business registered"
        );

        let email_sent = send_set_password_link(
            self.gateway.as_ref(),
            &owner,
            &business.name,
            &link,
            SetPasswordEmailKind::Welcome,
        )
        .await;
        record_delivery(self.store.as_ref(), &mut owner, email_sent, &audit).await;

        let message = if email_sent {
            "Business created. A set-password link has been emailed to the owner."
        } else {
            "Business created, but the set-password email could not be sent. Use resend credentials to try again."
        };

        Ok(BusinessRegistrationResult {
            business_id: business.business_id,
            business_name: business.name,
            owner_user_id: owner.user_id,
            owner_full_name: owner.full_name,
            owner_email: owner.email,
            email_sent,
            message: message.to_string(),
        })
    }
}
