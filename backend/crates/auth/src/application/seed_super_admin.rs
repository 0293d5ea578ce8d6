//! Super Admin Bootstrap
//!
//! Creates the first platform administrator at startup. Idempotent: an
//! existing user with the same email is left as is.

use std::sync::Arc;

use crate::application::services::AuthServices;
use crate::domain::entity::audit_log::{AuditLog, SYSTEM_ACTOR};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    email::Email,
    system_role::SystemRole,
    user_password::{RawPassword, UserPassword},
};
use crate::error::AuthResult;

pub struct SeedSuperAdminInput {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

pub struct SeedSuperAdminUseCase<S>
where
    S: UserRepository,
{
    store: Arc<S>,
    services: AuthServices,
}

impl<S> SeedSuperAdminUseCase<S>
where
    S: UserRepository,
{
    pub fn new(store: Arc<S>, services: AuthServices) -> Self {
        Self { store, services }
    }

    /// Returns `true` when a user was created
    pub async fn execute(&self, input: SeedSuperAdminInput) -> AuthResult<bool> {
        let email = Email::new(&input.email)?;
        if self.store.user_email_exists(&email).await? {
            tracing::debug!(email = %email, "Super admin already present");
            return Ok(false);
        }

        let raw_password = RawPassword::new(input.password)?;
        let mut user = User::new(input.full_name, email, None, SystemRole::SuperAdmin);
        user.set_password(UserPassword::from_raw(&raw_password, &self.services.hasher)?);

        let audit = AuditLog::new(
            AuditAction::SeedSuperAdmin,
            audit_entity::USER,
            user.user_id,
            user.user_id,
            None,
            SYSTEM_ACTOR,
        );
        self.store.insert_user(&user, &audit).await?;

        tracing::info!(user_id = %user.user_id, email = %user.email, "Super admin seeded");
        Ok(true)
    }
}
