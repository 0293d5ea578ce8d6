//! Business Details Use Case

use std::sync::Arc;

use crate::application::access_guard::{Actor, ensure_business_access};
use crate::domain::entity::business::Business;
use crate::domain::repository::{BusinessRepository, MembershipRepository};
use crate::domain::value_object::ids::BusinessId;
use crate::error::{AuthError, AuthResult};

pub struct BusinessDetailsUseCase<S>
where
    S: BusinessRepository + MembershipRepository,
{
    store: Arc<S>,
}

impl<S> BusinessDetailsUseCase<S>
where
    S: BusinessRepository + MembershipRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Platform admins see any business; members only their own
    pub async fn get(&self, actor: &Actor, business_id: BusinessId) -> AuthResult<Business> {
        ensure_business_access(self.store.as_ref(), &actor.identity, &business_id).await?;

        self.store
            .find_business_by_id(&business_id)
            .await?
            .ok_or_else(|| AuthError::not_found("Business not found"))
    }
}
