//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.
//!
//! Every lookup here excludes soft-deleted rows; membership lookups also
//! exclude memberships whose business is soft-deleted.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entity::{
    audit_log::AuditLog,
    business::Business,
    business_user::{BusinessUser, TeamMember},
    user::User,
};
use crate::domain::value_object::{
    audit_action::AuditAction,
    email::Email,
    ids::{BusinessId, UserId},
    system_role::SystemRole,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn user_email_exists(&self, email: &Email) -> AuthResult<bool>;

    /// Ordered by full name; returns the page and the total match count
    async fn list_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<User>, u64)>;

    /// Insert a standalone user together with its audit row
    async fn insert_user(&self, user: &User, audit: &AuditLog) -> AuthResult<()>;

    /// Persist user changes together with their audit row
    async fn update_user(&self, user: &User, audit: &AuditLog) -> AuthResult<()>;
}

/// Business repository trait
#[trait_variant::make(BusinessRepository: Send)]
pub trait LocalBusinessRepository {
    async fn find_business_by_id(&self, business_id: &BusinessId) -> AuthResult<Option<Business>>;

    async fn business_name_exists(&self, name: &str) -> AuthResult<bool>;
}

/// Membership (business user) repository trait
#[trait_variant::make(MembershipRepository: Send)]
pub trait LocalMembershipRepository {
    /// The user's membership, active or suspended
    async fn find_membership_by_user(&self, user_id: &UserId) -> AuthResult<Option<BusinessUser>>;

    /// The user's membership, only if active
    async fn find_active_membership_by_user(
        &self,
        user_id: &UserId,
    ) -> AuthResult<Option<BusinessUser>>;

    /// Active membership binding `user_id` to `business_id`
    async fn find_active_membership(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
    ) -> AuthResult<Option<BusinessUser>>;

    /// Members of a business ordered by join date, optionally narrowed by a
    /// lowercase search term; returns the page and the total match count
    async fn list_members(
        &self,
        business_id: &BusinessId,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<TeamMember>, u64)>;

    /// Persist membership changes together with their audit row
    async fn update_membership(&self, membership: &BusinessUser, audit: &AuditLog)
    -> AuthResult<()>;
}

/// Multi-entity writes that must commit atomically
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Business, owner, owner membership and audit row in one transaction
    async fn register_business(
        &self,
        business: &Business,
        owner: &User,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()>;

    /// New user, membership and audit row in one transaction
    async fn add_member(
        &self,
        user: &User,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()>;
}

/// Case-insensitive substring match on name or email; `term` is already
/// trimmed and lowercased
pub fn matches_search(term: &str, full_name: &str, email: &Email) -> bool {
    full_name.to_lowercase().contains(term) || email.as_str().contains(term)
}

/// Filter over the user directory
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Lowercase search term
    pub search: Option<String>,
    /// Empty means any role
    pub roles: Vec<SystemRole>,
}

impl UserFilter {
    /// In-memory evaluation, mirrors the SQL predicate
    pub fn matches(&self, user: &User) -> bool {
        !user.is_deleted
            && (self.roles.is_empty() || self.roles.contains(&user.system_role))
            && self
                .search
                .as_deref()
                .is_none_or(|term| matches_search(term, &user.full_name, &user.email))
    }
}

/// Filter over the audit log
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub actions: Vec<AuditAction>,
    pub entity_id: Option<Uuid>,
    pub user_id: Option<UserId>,
    pub since: Option<DateTime<Utc>>,
}

impl AuditQuery {
    pub fn actions(actions: &[AuditAction]) -> Self {
        Self {
            actions: actions.to_vec(),
            ..Self::default()
        }
    }

    pub fn on_entity(mut self, entity_id: impl Into<Uuid>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn by_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// In-memory evaluation, mirrors the SQL predicate
    pub fn matches(&self, log: &AuditLog) -> bool {
        (self.actions.is_empty() || self.actions.contains(&log.action))
            && self.entity_id.is_none_or(|id| id == log.entity_id)
            && self.user_id.is_none_or(|id| id == log.user_id)
            && self.since.is_none_or(|since| log.timestamp >= since)
    }
}

/// Audit history used as the rate-limit counter source
#[trait_variant::make(RateLimitLedger: Send)]
pub trait LocalRateLimitLedger {
    async fn count_audit_logs(&self, query: &AuditQuery) -> AuthResult<u64>;

    async fn max_audit_log_timestamp(&self, query: &AuditQuery)
    -> AuthResult<Option<DateTime<Utc>>>;
}

/// Audit trail reads
#[trait_variant::make(AuditLogRepository: Send)]
pub trait LocalAuditLogRepository {
    /// Newest first; `None` spans every business plus system rows.
    /// Returns the page and the total row count.
    async fn list_audit_logs(
        &self,
        business_id: Option<&BusinessId>,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<AuditLog>, u64)>;
}

/// Everything the auth use cases need from storage
pub trait AuthStore:
    UserRepository
    + BusinessRepository
    + MembershipRepository
    + CredentialStore
    + RateLimitLedger
    + AuditLogRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository
        + BusinessRepository
        + MembershipRepository
        + CredentialStore
        + RateLimitLedger
        + AuditLogRepository
        + Send
        + Sync
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::audit_action::audit_entity;
    use chrono::TimeDelta;

    #[test]
    fn test_audit_query_matches() {
        let admin = UserId::new();
        let target = UserId::new();
        let log = AuditLog::new(
            AuditAction::ResetPasswordLink,
            audit_entity::USER,
            target,
            admin,
            None,
            "admin@acme.com",
        );

        let query = AuditQuery::actions(AuditAction::RESEND_CLASS)
            .on_entity(target)
            .by_user(admin)
            .since(Utc::now() - TimeDelta::hours(1));
        assert!(query.matches(&log));

        assert!(!AuditQuery::actions(&[AuditAction::Invite]).matches(&log));
        assert!(!AuditQuery::default().by_user(target).matches(&log));
        assert!(
            !AuditQuery::default()
                .since(Utc::now() + TimeDelta::hours(1))
                .matches(&log)
        );
    }

    #[test]
    fn test_user_filter_matches() {
        let admin = User::new(
            "Grace Hopper",
            Email::new("grace@platform.io").unwrap(),
            None,
            SystemRole::Admin,
        );

        assert!(UserFilter::default().matches(&admin));
        assert!(
            UserFilter {
                search: Some("hopper".into()),
                roles: vec![SystemRole::Admin, SystemRole::SuperAdmin],
            }
            .matches(&admin)
        );
        assert!(
            UserFilter {
                search: Some("platform.io".into()),
                ..UserFilter::default()
            }
            .matches(&admin)
        );
        assert!(
            !UserFilter {
                roles: vec![SystemRole::User],
                ..UserFilter::default()
            }
            .matches(&admin)
        );
        assert!(
            !UserFilter {
                search: Some("ada".into()),
                ..UserFilter::default()
            }
            .matches(&admin)
        );
    }
}
