//! Platform User Directory
//!
//! Paged user listings for platform administrators.

use std::sync::Arc;

use crate::application::access_guard::Actor;
use crate::application::pagination::{Page, PageRequest, search_term};
use crate::domain::entity::user::User;
use crate::domain::repository::{UserFilter, UserRepository};
use crate::domain::value_object::system_role::SystemRole;
use crate::error::{AuthError, AuthResult};

pub struct UserDirectoryUseCase<S>
where
    S: UserRepository,
{
    store: Arc<S>,
}

impl<S> UserDirectoryUseCase<S>
where
    S: UserRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All live users, optionally narrowed to one system role
    pub async fn list_users(
        &self,
        actor: &Actor,
        page: PageRequest,
        search: Option<&str>,
        role: Option<SystemRole>,
    ) -> AuthResult<Page<User>> {
        let filter = UserFilter {
            search: search_term(search),
            roles: role.into_iter().collect(),
        };
        self.list(actor, page, &filter).await
    }

    /// Users holding `admin` or `super_admin`
    pub async fn list_admins(
        &self,
        actor: &Actor,
        page: PageRequest,
        search: Option<&str>,
    ) -> AuthResult<Page<User>> {
        let filter = UserFilter {
            search: search_term(search),
            roles: vec![SystemRole::Admin, SystemRole::SuperAdmin],
        };
        self.list(actor, page, &filter).await
    }

    async fn list(
        &self,
        actor: &Actor,
        page: PageRequest,
        filter: &UserFilter,
    ) -> AuthResult<Page<User>> {
        if !actor.identity.is_system() {
            return Err(AuthError::unauthorized(
                "Only platform administrators can list users",
            ));
        }

        let (items, total_count) = self
            .store
            .list_users(filter, page.limit(), page.offset())
            .await?;

        Ok(Page::new(items, page, total_count))
    }
}
