//! Team Management Use Cases
//!
//! Suspend or reactivate members, change their role, and list the team.
//! Only owners and admins reach any of these. The owner membership is
//! never modified here.

use std::sync::Arc;

use crate::application::access_guard::Actor;
use crate::application::pagination::{Page, PageRequest, search_term};
use crate::domain::entity::business_user::{BusinessUser, TeamMember};
use crate::domain::repository::MembershipRepository;
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    identity::Identity,
    ids::{BusinessId, UserId},
    tenant_role::TenantRole,
};
use crate::error::{AuthError, AuthResult};

pub struct TeamUseCase<S>
where
    S: MembershipRepository,
{
    store: Arc<S>,
}

impl<S> TeamUseCase<S>
where
    S: MembershipRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Suspend (`activate = false`) or reactivate a member.
    ///
    /// The verified flag is left untouched.
    pub async fn toggle_status(
        &self,
        actor: &Actor,
        target_user_id: UserId,
        activate: bool,
    ) -> AuthResult<BusinessUser> {
        let (business_id, role) = tenant_of(actor)?;
        if !role.can_manage_team() {
            return Err(AuthError::unauthorized(
                "Only owners and admins can change member status",
            ));
        }

        let mut target = self.find_member(business_id, target_user_id).await?;

        if target.user_id == actor.user_id() {
            return Err(AuthError::invalid_operation(
                "You cannot change your own status",
            ));
        }
        if target.is_owner() {
            return Err(AuthError::invalid_operation(
                "The business owner cannot be suspended",
            ));
        }
        if target.is_active == activate {
            return Ok(target);
        }

        target.is_active = activate;
        let action = if activate {
            AuditAction::ActivateUser
        } else {
            AuditAction::SuspendUser
        };
        let audit = actor.audit(
            action,
            audit_entity::BUSINESS_USER,
            target.membership_id,
            Some(business_id),
        );
        self.store.update_membership(&target, &audit).await?;

        tracing::info!(
            user_id = %target.user_id,
            business_id = %business_id,
            active = activate,
            "Member status changed"
        );
        Ok(target)
    }

    pub async fn change_role(
        &self,
        actor: &Actor,
        target_user_id: UserId,
        new_role: TenantRole,
    ) -> AuthResult<BusinessUser> {
        if !new_role.is_assignable() {
            return Err(AuthError::invalid_operation(
                "Role must be Admin, Member, or Staff",
            ));
        }

        let (business_id, role) = tenant_of(actor)?;
        if role != TenantRole::Owner {
            return Err(AuthError::unauthorized("Only the owner can change roles"));
        }

        let mut target = self.find_member(business_id, target_user_id).await?;

        if target.user_id == actor.user_id() {
            return Err(AuthError::invalid_operation("You cannot change your own role"));
        }
        if target.is_owner() {
            return Err(AuthError::invalid_operation(
                "The owner role cannot be reassigned",
            ));
        }
        if target.role == new_role {
            return Err(AuthError::invalid_operation(format!(
                "User already has the {new_role} role"
            )));
        }

        let previous = target.role;
        target.role = new_role;
        let audit = actor.audit(
            AuditAction::ChangeRole,
            audit_entity::BUSINESS_USER,
            target.membership_id,
            Some(business_id),
        );
        self.store.update_membership(&target, &audit).await?;

        tracing::info!(
            user_id = %target.user_id,
            business_id = %business_id,
            from = %previous,
            to = %new_role,
            "Member role changed"
        );
        Ok(target)
    }

    /// Members of the actor's business, ordered by join date.
    ///
    /// `search` matches name or email, case-insensitively.
    pub async fn list_team(
        &self,
        actor: &Actor,
        page: PageRequest,
        search: Option<&str>,
    ) -> AuthResult<Page<TeamMember>> {
        let (business_id, role) = tenant_of(actor)?;
        if !role.can_manage_team() {
            return Err(AuthError::unauthorized(
                "Only owners and admins can view the team",
            ));
        }

        let search = search_term(search);
        let (items, total_count) = self
            .store
            .list_members(&business_id, search.as_deref(), page.limit(), page.offset())
            .await?;

        Ok(Page::new(items, page, total_count))
    }

    async fn find_member(
        &self,
        business_id: BusinessId,
        user_id: UserId,
    ) -> AuthResult<BusinessUser> {
        self.store
            .find_membership_by_user(&user_id)
            .await?
            .filter(|membership| membership.business_id == business_id)
            .ok_or_else(|| AuthError::not_found("Business user not found"))
    }
}

fn tenant_of(actor: &Actor) -> AuthResult<(BusinessId, TenantRole)> {
    match actor.identity {
        Identity::Tenant {
            business_id, role, ..
        } => Ok((business_id, role)),
        Identity::System { .. } => Err(AuthError::unauthorized("Business access denied")),
    }
}
