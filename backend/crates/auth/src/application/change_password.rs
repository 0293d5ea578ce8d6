//! Change Password Use Case

use std::sync::Arc;

use crate::application::access_guard::Actor;
use crate::application::services::AuthServices;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<S>
where
    S: UserRepository,
{
    store: Arc<S>,
    services: AuthServices,
}

impl<S> ChangePasswordUseCase<S>
where
    S: UserRepository,
{
    pub fn new(store: Arc<S>, services: AuthServices) -> Self {
        Self { store, services }
    }

    /// Tokens issued before the change stop resolving afterwards.
    pub async fn execute(&self, actor: &Actor, input: ChangePasswordInput) -> AuthResult<()> {
        let incorrect = || AuthError::unauthorized("Current password is incorrect");

        let mut user = self
            .store
            .find_user_by_id(&actor.user_id())
            .await?
            .ok_or_else(|| AuthError::unauthorized("Account no longer exists"))?;

        let current = RawPassword::new(input.current_password).map_err(|_| incorrect())?;
        let verified = user
            .password
            .as_ref()
            .is_some_and(|hash| hash.verify(&current, &self.services.hasher));
        if !verified {
            return Err(incorrect());
        }

        let new_password = RawPassword::new(input.new_password)?;
        if user
            .password
            .as_ref()
            .is_some_and(|hash| hash.verify(&new_password, &self.services.hasher))
        {
            return Err(AuthError::invalid_operation(
                "New password must differ from the current one",
            ));
        }

        user.set_password(UserPassword::from_raw(&new_password, &self.services.hasher)?);

        let audit = actor.audit(
            AuditAction::ChangePassword,
            audit_entity::USER,
            user.user_id,
            actor.identity.business_id(),
        );
        self.store.update_user(&user, &audit).await?;

        tracing::info!(user_id = %user.user_id, "Password changed");
        Ok(())
    }
}
