//! Authorization Guard
//!
//! Turns a bearer token into an [`Actor`] by re-reading the user and the
//! membership from the store, then answers tenant-access questions for
//! the use cases.

use std::sync::Arc;

use crate::application::services::AuthServices;
use crate::domain::entity::{audit_log::AuditLog, business_user::BusinessUser, user::User};
use crate::domain::repository::{MembershipRepository, UserRepository};
use crate::domain::value_object::{
    audit_action::AuditAction,
    email::Email,
    identity::Identity,
    ids::{BusinessId, UserId},
};
use crate::error::{AuthError, AuthResult};

/// Authenticated caller of a use case
#[derive(Debug, Clone)]
pub struct Actor {
    pub identity: Identity,
    pub email: Email,
    pub full_name: String,
}

impl Actor {
    pub fn user_id(&self) -> UserId {
        self.identity.user_id()
    }

    /// Audit row attributed to this actor
    pub fn audit(
        &self,
        action: AuditAction,
        entity_name: &str,
        entity_id: impl Into<uuid::Uuid>,
        business_id: Option<BusinessId>,
    ) -> AuditLog {
        AuditLog::new(
            action,
            entity_name,
            entity_id,
            self.user_id(),
            business_id,
            self.email.as_str(),
        )
    }
}

pub struct IdentityResolver<S>
where
    S: UserRepository + MembershipRepository,
{
    store: Arc<S>,
    services: AuthServices,
}

impl<S> IdentityResolver<S>
where
    S: UserRepository + MembershipRepository,
{
    pub fn new(store: Arc<S>, services: AuthServices) -> Self {
        Self { store, services }
    }

    /// Validate a bearer token and resolve its subject
    pub async fn resolve_bearer(&self, token: &str) -> AuthResult<Actor> {
        let verified = self.services.tokens.validate(token)?;
        let user_id = UserId::from_uuid(verified.claims.sub);

        let user = self
            .store
            .find_user_by_id(&user_id)
            .await?
            .ok_or_else(|| AuthError::unauthorized("Account no longer exists"))?;

        if !user.accepts_token_issued_at(verified.issued_at) {
            return Err(AuthError::unauthorized(
                "Session expired after a password change, please log in again",
            ));
        }

        self.resolve_user(user).await
    }

    /// Resolve the identity of an already loaded user
    pub async fn resolve_user(&self, user: User) -> AuthResult<Actor> {
        let identity = resolve_identity(self.store.as_ref(), &user).await?;
        Ok(Actor {
            identity,
            email: user.email,
            full_name: user.full_name,
        })
    }
}

/// System roles bypass membership; everyone else needs an active one
pub async fn resolve_identity<S: MembershipRepository>(
    store: &S,
    user: &User,
) -> AuthResult<Identity> {
    if user.is_platform_admin() {
        return Ok(Identity::System {
            user_id: user.user_id,
            role: user.system_role,
        });
    }

    let membership = store
        .find_active_membership_by_user(&user.user_id)
        .await?
        .ok_or_else(|| AuthError::unauthorized("Business access denied"))?;

    Ok(Identity::Tenant {
        user_id: user.user_id,
        business_id: membership.business_id,
        membership_id: membership.membership_id,
        role: membership.role,
    })
}

/// Tenant-scoped access check for `business_id`
pub async fn ensure_business_access<S: MembershipRepository>(
    store: &S,
    identity: &Identity,
    business_id: &BusinessId,
) -> AuthResult<()> {
    if identity.is_system() {
        return Ok(());
    }

    store
        .find_active_membership(&identity.user_id(), business_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AuthError::unauthorized("You do not have access to this business"))
}

/// May `actor` re-issue credentials for the member `target`?
pub fn ensure_can_reset_password(actor: &Identity, target: &BusinessUser) -> AuthResult<()> {
    match actor {
        Identity::System { role, .. } if role.is_platform_admin() => Ok(()),
        Identity::System { .. } => Err(AuthError::unauthorized(
            "Only administrators can reset passwords",
        )),
        Identity::Tenant {
            user_id,
            business_id,
            role,
            ..
        } => {
            if *business_id != target.business_id {
                return Err(AuthError::unauthorized(
                    "You can only reset passwords for members of your business",
                ));
            }
            if !role.can_manage_team() {
                return Err(AuthError::unauthorized(
                    "Only owners and admins can reset passwords",
                ));
            }
            if *user_id == target.user_id {
                return Err(AuthError::unauthorized("You cannot reset your own password"));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        ids::MembershipId, system_role::SystemRole, tenant_role::TenantRole,
    };

    fn tenant(user_id: UserId, business_id: BusinessId, role: TenantRole) -> Identity {
        Identity::Tenant {
            user_id,
            business_id,
            membership_id: MembershipId::new(),
            role,
        }
    }

    #[test]
    fn test_system_admin_can_reset_anyone() {
        let target = BusinessUser::new(BusinessId::new(), UserId::new(), TenantRole::Owner);
        let actor = Identity::System {
            user_id: UserId::new(),
            role: SystemRole::Admin,
        };
        assert!(ensure_can_reset_password(&actor, &target).is_ok());
    }

    #[test]
    fn test_reset_requires_same_business() {
        let target = BusinessUser::new(BusinessId::new(), UserId::new(), TenantRole::Member);
        let actor = tenant(UserId::new(), BusinessId::new(), TenantRole::Owner);
        assert!(matches!(
            ensure_can_reset_password(&actor, &target),
            Err(AuthError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_reset_requires_manager_role() {
        let business_id = BusinessId::new();
        let target = BusinessUser::new(business_id, UserId::new(), TenantRole::Member);

        let staff = tenant(UserId::new(), business_id, TenantRole::Staff);
        assert!(ensure_can_reset_password(&staff, &target).is_err());

        let admin = tenant(UserId::new(), business_id, TenantRole::Admin);
        assert!(ensure_can_reset_password(&admin, &target).is_ok());
    }

    #[test]
    fn test_cannot_reset_own_password() {
        let business_id = BusinessId::new();
        let owner_id = UserId::new();
        let target = BusinessUser::new(business_id, owner_id, TenantRole::Owner);
        let actor = tenant(owner_id, business_id, TenantRole::Owner);

        let err = ensure_can_reset_password(&actor, &target).unwrap_err();
        assert_eq!(err.to_string(), "You cannot reset your own password");
    }
}
