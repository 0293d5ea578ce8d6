//! Own Profile Use Case
//!
//! Read and edit the caller's own name, email and phone. Blank fields are
//! left unchanged.

use std::sync::Arc;

use crate::application::access_guard::Actor;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    email::Email,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct ProfileUseCase<S>
where
    S: UserRepository,
{
    store: Arc<S>,
}

impl<S> ProfileUseCase<S>
where
    S: UserRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn get(&self, actor: &Actor) -> AuthResult<User> {
        self.store
            .find_user_by_id(&actor.user_id())
            .await?
            .ok_or_else(|| AuthError::not_found("User not found"))
    }

    /// An email change must not collide with another live user. Writes
    /// nothing when no field actually changes.
    pub async fn update(&self, actor: &Actor, input: UpdateProfileInput) -> AuthResult<User> {
        let mut user = self.get(actor).await?;

        let full_name = non_blank(input.full_name);
        let phone = non_blank(input.phone);
        let email = non_blank(input.email).map(Email::new).transpose()?;

        let new_email = email.as_ref().filter(|email| **email != user.email);
        if let Some(new_email) = new_email {
            if self.store.user_email_exists(new_email).await? {
                return Err(AuthError::conflict("A user with this email already exists"));
            }
        }

        if !user.update_profile(full_name, email, phone) {
            return Ok(user);
        }

        let audit = actor.audit(
            AuditAction::UpdateProfile,
            audit_entity::USER,
            user.user_id,
            actor.identity.business_id(),
        );
        self.store.update_user(&user, &audit).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");
        Ok(user)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
