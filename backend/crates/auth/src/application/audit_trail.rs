//! Audit Trail
//!
//! Per-business trail for members and platform admins, plus the
//! system-wide trail for platform admins only.

use std::sync::Arc;

use crate::application::access_guard::{Actor, ensure_business_access};
use crate::application::pagination::{Page, PageRequest};
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::repository::{AuditLogRepository, MembershipRepository};
use crate::domain::value_object::ids::BusinessId;
use crate::error::{AuthError, AuthResult};

pub struct AuditTrailUseCase<S>
where
    S: AuditLogRepository + MembershipRepository,
{
    store: Arc<S>,
}

impl<S> AuditTrailUseCase<S>
where
    S: AuditLogRepository + MembershipRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Newest first
    pub async fn list(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        page: PageRequest,
    ) -> AuthResult<Page<AuditLog>> {
        ensure_business_access(self.store.as_ref(), &actor.identity, &business_id).await?;

        let (items, total_count) = self
            .store
            .list_audit_logs(Some(&business_id), page.limit(), page.offset())
            .await?;

        Ok(Page::new(items, page, total_count))
    }

    /// Every row across businesses, including platform-level actions
    pub async fn list_system(&self, actor: &Actor, page: PageRequest) -> AuthResult<Page<AuditLog>> {
        if !actor.identity.is_system() {
            return Err(AuthError::unauthorized(
                "Only platform administrators can view the system audit trail",
            ));
        }

        let (items, total_count) = self
            .store
            .list_audit_logs(None, page.limit(), page.offset())
            .await?;

        Ok(Page::new(items, page, total_count))
    }
}
