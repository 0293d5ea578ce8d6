//! End-to-end use case scenarios against an in-memory store

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, TimeDelta, Utc};
use platform::password::HashingCost;
use tower::ServiceExt;

use crate::application::{
    Actor, AuditTrailUseCase, AuthConfig, AuthServices, BusinessDetailsUseCase,
    ChangePasswordInput, ChangePasswordUseCase, IdentityResolver, InviteUserInput,
    InviteUserUseCase, LoginInput, LoginUseCase, PageRequest, ProfileUseCase,
    RegisterBusinessInput, RegisterBusinessUseCase, ResendCredentialsUseCase,
    SeedSuperAdminInput, SeedSuperAdminUseCase, SetPasswordInput, SetPasswordUseCase,
    TeamUseCase, TokenScope, UpdateProfileInput, UserDirectoryUseCase,
};
use crate::domain::entity::{
    audit_log::AuditLog,
    business::Business,
    business_user::{BusinessUser, TeamMember},
    user::User,
};
use crate::domain::notification::{
    NotificationError, NotificationGateway, SetPasswordEmail, SetPasswordEmailKind,
};
use crate::domain::repository::{
    AuditLogRepository, AuditQuery, BusinessRepository, CredentialStore, MembershipRepository,
    RateLimitLedger, UserFilter, UserRepository, matches_search,
};
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    email::Email,
    ids::{BusinessId, UserId},
    system_role::SystemRole,
    tenant_role::TenantRole,
};
use crate::error::{AuthError, AuthResult};
use crate::presentation::{
    AuthAppState, admin_router, auth_router, business_router, user_router,
};

const ADMIN_EMAIL: &str = "root@platform.io";
const ADMIN_PASSWORD: &str = "Platform-Root-Pass-91";
const MEMBER_PASSWORD: &str = "Blue-Kettle-Morning-7";

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    businesses: Vec<Business>,
    memberships: Vec<BusinessUser>,
    audit_logs: Vec<AuditLog>,
}

#[derive(Default)]
struct MemoryStore {
    state: Mutex<MemoryState>,
    writes: AtomicUsize,
    membership_lookups: AtomicUsize,
    /// Makes `user_email_exists` miss, as when a concurrent request wins
    /// the insert between the check and the write
    stale_email_check: AtomicBool,
}

fn page_of<T>(items: Vec<T>, limit: i64, offset: i64) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let page = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    (page, total)
}

impl MemoryStore {
    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemoryState) -> AuthResult<T>) -> AuthResult<T> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.with_state(f)
    }

    fn user(&self, user_id: UserId) -> User {
        self.with_state(|s| {
            s.users
                .iter()
                .find(|u| u.user_id == user_id)
                .cloned()
                .unwrap()
        })
    }

    fn membership(&self, user_id: UserId) -> BusinessUser {
        self.with_state(|s| {
            s.memberships
                .iter()
                .find(|m| m.user_id == user_id)
                .cloned()
                .unwrap()
        })
    }

    fn audit_count(&self, action: AuditAction) -> usize {
        self.with_state(|s| s.audit_logs.iter().filter(|l| l.action == action).count())
    }

    fn edit_user(&self, user_id: UserId, f: impl FnOnce(&mut User)) {
        self.with_state(|s| {
            if let Some(user) = s.users.iter_mut().find(|u| u.user_id == user_id) {
                f(user);
            }
        });
    }

    fn edit_business(&self, business_id: BusinessId, f: impl FnOnce(&mut Business)) {
        self.with_state(|s| {
            if let Some(business) = s.businesses.iter_mut().find(|b| b.business_id == business_id) {
                f(business);
            }
        });
    }

    fn user_id_of(&self, email: &str) -> UserId {
        self.with_state(|s| {
            s.users
                .iter()
                .find(|u| u.email.as_str() == email)
                .map(|u| u.user_id)
                .unwrap()
        })
    }

    fn push_audit(&self, log: AuditLog) {
        self.with_state(|s| s.audit_logs.push(log));
    }

    /// Mirrors the partial unique index on live users' emails
    fn live_email_taken(state: &MemoryState, email: &Email) -> bool {
        state.users.iter().any(|u| !u.is_deleted && u.email == *email)
    }

    fn live_membership(state: &MemoryState, user_id: &UserId) -> Option<BusinessUser> {
        state
            .memberships
            .iter()
            .filter(|m| !m.is_deleted && m.user_id == *user_id)
            .find(|m| {
                state
                    .businesses
                    .iter()
                    .any(|b| b.business_id == m.business_id && !b.is_deleted)
            })
            .cloned()
    }
}

impl UserRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.with_state(|s| {
            s.users
                .iter()
                .find(|u| !u.is_deleted && u.email == *email)
                .cloned()
        }))
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.with_state(|s| {
            s.users
                .iter()
                .find(|u| !u.is_deleted && u.user_id == *user_id)
                .cloned()
        }))
    }

    async fn user_email_exists(&self, email: &Email) -> AuthResult<bool> {
        if self.stale_email_check.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.with_state(|s| Self::live_email_taken(s, email)))
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<User>, u64)> {
        Ok(self.with_state(|s| {
            let mut users: Vec<User> = s.users.iter().filter(|u| filter.matches(u)).cloned().collect();
            users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
            page_of(users, limit, offset)
        }))
    }

    async fn insert_user(&self, user: &User, audit: &AuditLog) -> AuthResult<()> {
        self.write(|s| {
            if Self::live_email_taken(s, &user.email) {
                return Err(AuthError::conflict("A user with this email already exists"));
            }
            s.users.push(user.clone());
            s.audit_logs.push(audit.clone());
            Ok(())
        })
    }

    async fn update_user(&self, user: &User, audit: &AuditLog) -> AuthResult<()> {
        self.write(|s| {
            let stored = s
                .users
                .iter_mut()
                .find(|u| u.user_id == user.user_id)
                .ok_or_else(|| AuthError::not_found("User not found"))?;
            *stored = user.clone();
            s.audit_logs.push(audit.clone());
            Ok(())
        })
    }
}

impl BusinessRepository for MemoryStore {
    async fn find_business_by_id(&self, business_id: &BusinessId) -> AuthResult<Option<Business>> {
        Ok(self.with_state(|s| {
            s.businesses
                .iter()
                .find(|b| !b.is_deleted && b.business_id == *business_id)
                .cloned()
        }))
    }

    async fn business_name_exists(&self, name: &str) -> AuthResult<bool> {
        Ok(self.with_state(|s| s.businesses.iter().any(|b| b.name == name)))
    }
}

impl MembershipRepository for MemoryStore {
    async fn find_membership_by_user(&self, user_id: &UserId) -> AuthResult<Option<BusinessUser>> {
        self.membership_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.with_state(|s| Self::live_membership(s, user_id)))
    }

    async fn find_active_membership_by_user(
        &self,
        user_id: &UserId,
    ) -> AuthResult<Option<BusinessUser>> {
        self.membership_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.with_state(|s| Self::live_membership(s, user_id).filter(|m| m.is_active)))
    }

    async fn find_active_membership(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
    ) -> AuthResult<Option<BusinessUser>> {
        self.membership_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.with_state(|s| {
            Self::live_membership(s, user_id)
                .filter(|m| m.is_active && m.business_id == *business_id)
        }))
    }

    async fn list_members(
        &self,
        business_id: &BusinessId,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<TeamMember>, u64)> {
        Ok(self.with_state(|s| {
            let mut members: Vec<TeamMember> = s
                .memberships
                .iter()
                .filter(|m| !m.is_deleted && m.business_id == *business_id)
                .filter_map(|m| {
                    let user = s
                        .users
                        .iter()
                        .find(|u| !u.is_deleted && u.user_id == m.user_id)?;
                    Some(TeamMember {
                        membership: m.clone(),
                        full_name: user.full_name.clone(),
                        email: user.email.clone(),
                    })
                })
                .filter(|t| search.is_none_or(|term| matches_search(term, &t.full_name, &t.email)))
                .collect();
            members.sort_by_key(|t| t.membership.joined_at);
            page_of(members, limit, offset)
        }))
    }

    async fn update_membership(
        &self,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()> {
        self.write(|s| {
            let stored = s
                .memberships
                .iter_mut()
                .find(|m| m.membership_id == membership.membership_id)
                .ok_or_else(|| AuthError::not_found("Business user not found"))?;
            *stored = membership.clone();
            s.audit_logs.push(audit.clone());
            Ok(())
        })
    }
}

impl CredentialStore for MemoryStore {
    async fn register_business(
        &self,
        business: &Business,
        owner: &User,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()> {
        self.write(|s| {
            if Self::live_email_taken(s, &owner.email) {
                return Err(AuthError::conflict("A user with this email already exists"));
            }
            if s.businesses.iter().any(|b| b.name == business.name) {
                return Err(AuthError::conflict(
                    "A business with this name already exists",
                ));
            }
            s.businesses.push(business.clone());
            s.users.push(owner.clone());
            s.memberships.push(membership.clone());
            s.audit_logs.push(audit.clone());
            Ok(())
        })
    }

    async fn add_member(
        &self,
        user: &User,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()> {
        self.write(|s| {
            if Self::live_email_taken(s, &user.email) {
                return Err(AuthError::conflict("A user with this email already exists"));
            }
            s.users.push(user.clone());
            s.memberships.push(membership.clone());
            s.audit_logs.push(audit.clone());
            Ok(())
        })
    }
}

impl RateLimitLedger for MemoryStore {
    async fn count_audit_logs(&self, query: &AuditQuery) -> AuthResult<u64> {
        Ok(self.with_state(|s| s.audit_logs.iter().filter(|l| query.matches(l)).count() as u64))
    }

    async fn max_audit_log_timestamp(
        &self,
        query: &AuditQuery,
    ) -> AuthResult<Option<DateTime<Utc>>> {
        Ok(self.with_state(|s| {
            s.audit_logs
                .iter()
                .filter(|l| query.matches(l))
                .map(|l| l.timestamp)
                .max()
        }))
    }
}

impl AuditLogRepository for MemoryStore {
    async fn list_audit_logs(
        &self,
        business_id: Option<&BusinessId>,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<AuditLog>, u64)> {
        Ok(self.with_state(|s| {
            let mut logs: Vec<AuditLog> = s
                .audit_logs
                .iter()
                .filter(|l| business_id.is_none_or(|id| l.business_id == Some(*id)))
                .cloned()
                .collect();
            logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            page_of(logs, limit, offset)
        }))
    }
}

// ============================================================================
// Gateways
// ============================================================================

#[derive(Default)]
struct RecordingGateway {
    sent: Mutex<Vec<SetPasswordEmail>>,
    fail: bool,
}

impl RecordingGateway {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last(&self) -> SetPasswordEmail {
        self.sent.lock().unwrap().last().cloned().unwrap()
    }

    /// Raw token of the most recent link
    fn last_token(&self) -> String {
        let link = self.last().link;
        link.split("token=").nth(1).unwrap().to_string()
    }
}

impl NotificationGateway for RecordingGateway {
    async fn send_set_password_email(
        &self,
        email: &SetPasswordEmail,
    ) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::Delivery("relay unavailable".into()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    store: Arc<MemoryStore>,
    gateway: Arc<RecordingGateway>,
    services: AuthServices,
}

fn test_services() -> AuthServices {
    AuthServices::new(AuthConfig {
        hashing_cost: HashingCost::minimal(),
        frontend_base_url: "https://app.test/".to_string(),
        ..AuthConfig::with_random_secret()
    })
    .unwrap()
}

impl Harness {
    fn new() -> Self {
        Self::with_gateway(RecordingGateway::default())
    }

    fn with_gateway(gateway: RecordingGateway) -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            gateway: Arc::new(gateway),
            services: test_services(),
        }
    }

    async fn actor(&self, user_id: UserId) -> AuthResult<Actor> {
        let user = self.store.user(user_id);
        IdentityResolver::new(self.store.clone(), self.services.clone())
            .resolve_user(user)
            .await
    }

    async fn super_admin(&self) -> Actor {
        SeedSuperAdminUseCase::new(self.store.clone(), self.services.clone())
            .execute(SeedSuperAdminInput {
                email: ADMIN_EMAIL.into(),
                full_name: "Root".into(),
                password: ADMIN_PASSWORD.into(),
            })
            .await
            .unwrap();
        let user = self
            .store
            .find_user_by_email(&Email::new(ADMIN_EMAIL).unwrap())
            .await
            .unwrap()
            .unwrap();
        self.actor(user.user_id).await.unwrap()
    }

    async fn register(
        &self,
        admin: &Actor,
        name: &str,
        owner_email: &str,
    ) -> AuthResult<(BusinessId, UserId)> {
        let result = RegisterBusinessUseCase::new(
            self.store.clone(),
            self.gateway.clone(),
            self.services.clone(),
        )
        .execute(
            admin,
            RegisterBusinessInput {
                business_name: name.into(),
                business_email: format!("billing@{}.com", name.to_lowercase()),
                business_address: None,
                business_phone: None,
                owner_full_name: "Olivia Owner".into(),
                owner_email: owner_email.into(),
                owner_phone: None,
            },
        )
        .await?;
        Ok((result.business_id, result.owner_user_id))
    }

    async fn set_password(&self, user_id: UserId, token: String) -> AuthResult<()> {
        SetPasswordUseCase::new(self.store.clone(), self.services.clone())
            .execute(SetPasswordInput {
                user_id,
                token,
                new_password: MEMBER_PASSWORD.into(),
            })
            .await
    }

    async fn invite(
        &self,
        inviter: &Actor,
        email: &str,
        role: TenantRole,
    ) -> AuthResult<UserId> {
        InviteUserUseCase::new(
            self.store.clone(),
            self.gateway.clone(),
            self.services.clone(),
        )
        .execute(
            inviter,
            InviteUserInput {
                full_name: "Max Member".into(),
                email: email.into(),
                phone: None,
                role,
            },
        )
        .await
        .map(|output| output.user_id)
    }

    async fn resend(&self, admin: &Actor, target: UserId) -> AuthResult<bool> {
        ResendCredentialsUseCase::new(
            self.store.clone(),
            self.gateway.clone(),
            self.services.clone(),
        )
        .execute(admin, target)
        .await
        .map(|output| output.email_sent)
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<crate::application::LoginOutput> {
        LoginUseCase::new(self.store.clone(), self.services.clone())
            .execute(LoginInput {
                email: email.into(),
                password: password.into(),
            })
            .await
    }

    fn team(&self) -> TeamUseCase<MemoryStore> {
        TeamUseCase::new(self.store.clone())
    }

    /// Registered business with an owner actor and an invited member
    async fn business_with_member(&self, role: TenantRole) -> (BusinessId, Actor, UserId) {
        let admin = self.super_admin().await;
        let (business_id, owner_id) = self
            .register(&admin, "Acme", "owner@acme.com")
            .await
            .unwrap();
        let owner = self.actor(owner_id).await.unwrap();
        let member_id = self.invite(&owner, "max@acme.com", role).await.unwrap();
        (business_id, owner, member_id)
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_business_creates_owner_membership_and_audit() {
    let h = Harness::new();
    let admin = h.super_admin().await;

    let (business_id, owner_id) = h
        .register(&admin, "Acme", "Owner@Acme.com")
        .await
        .unwrap();

    h.store.with_state(|s| {
        assert_eq!(s.businesses.len(), 1);
        assert_eq!(s.memberships.len(), 1);
        assert_eq!(s.memberships[0].role, TenantRole::Owner);
        assert_eq!(s.memberships[0].business_id, business_id);

        let created: Vec<_> = s
            .audit_logs
            .iter()
            .filter(|l| l.action == AuditAction::CreateBusiness)
            .collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].entity_id, business_id.into_uuid());
        assert_eq!(created[0].entity_name, audit_entity::BUSINESS);
        assert_eq!(created[0].change_by, ADMIN_EMAIL);
    });

    let owner = h.store.user(owner_id);
    assert_eq!(owner.email.as_str(), "owner@acme.com");
    assert!(owner.password.is_none());
    assert!(owner.pending_reset_token().is_some());
    assert!(owner.credentials_email_sent);
    assert_eq!(h.store.audit_count(AuditAction::CredentialsEmailSent), 1);

    let email = h.gateway.last();
    assert_eq!(email.kind, SetPasswordEmailKind::Welcome);
    assert_eq!(email.business_name, "Acme");
    assert!(
        email
            .link
            .starts_with(&format!("https://app.test/set-password?userId={owner_id}&token="))
    );
}

#[tokio::test]
async fn test_register_duplicate_owner_email_conflicts() {
    let h = Harness::new();
    let admin = h.super_admin().await;
    h.register(&admin, "Acme", "Owner@Acme.com").await.unwrap();

    let err = h
        .register(&admin, "Acme Two", "OWNER@ACME.COM")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));

    let err = h
        .register(&admin, "Acme", "someone@else.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[tokio::test]
async fn test_register_requires_platform_admin() {
    let h = Harness::new();
    let (_, owner, _) = h.business_with_member(TenantRole::Member).await;

    let err = h
        .register(&owner, "Globex", "hank@globex.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_register_survives_email_failure() {
    let h = Harness::with_gateway(RecordingGateway::failing());
    let admin = h.super_admin().await;

    let result = RegisterBusinessUseCase::new(h.store.clone(), h.gateway.clone(), h.services.clone())
        .execute(
            &admin,
            RegisterBusinessInput {
                business_name: "Acme".into(),
                business_email: "billing@acme.com".into(),
                business_address: Some("1 Main St".into()),
                business_phone: None,
                owner_full_name: "Olivia Owner".into(),
                owner_email: "owner@acme.com".into(),
                owner_phone: None,
            },
        )
        .await
        .unwrap();

    assert!(!result.email_sent);
    assert!(result.message.contains("could not be sent"));
    assert!(!h.store.user(result.owner_user_id).credentials_email_sent);
    assert_eq!(h.store.audit_count(AuditAction::CredentialsEmailFailed), 1);
    assert_eq!(h.store.audit_count(AuditAction::CreateBusiness), 1);
}

// ============================================================================
// Set password
// ============================================================================

#[tokio::test]
async fn test_set_password_token_is_single_use() {
    let h = Harness::new();
    let admin = h.super_admin().await;
    let (_, owner_id) = h.register(&admin, "Acme", "owner@acme.com").await.unwrap();
    let token = h.gateway.last_token();

    h.set_password(owner_id, token.clone()).await.unwrap();

    let owner = h.store.user(owner_id);
    assert!(owner.password_set);
    assert!(owner.password_changed_at.is_some());
    assert!(owner.reset_token_hash.is_none());
    assert!(owner.reset_token_expires_at.is_none());
    assert_eq!(h.store.audit_count(AuditAction::SetPassword), 1);

    let err = h.set_password(owner_id, token).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));

    let output = h.login("owner@acme.com", MEMBER_PASSWORD).await.unwrap();
    assert_eq!(output.access_token.scope, TokenScope::Tenant);
}

#[tokio::test]
async fn test_set_password_rejects_wrong_or_expired_token() {
    let h = Harness::new();
    let admin = h.super_admin().await;
    let (_, owner_id) = h.register(&admin, "Acme", "owner@acme.com").await.unwrap();
    let token = h.gateway.last_token();

    let err = h
        .set_password(owner_id, "0".repeat(token.len()))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));

    h.store.edit_user(owner_id, |user| {
        user.reset_token_expires_at = Some(Utc::now() - TimeDelta::minutes(1));
    });
    let err = h.set_password(owner_id, token).await.unwrap_err();
    assert_eq!(err.to_string(), "Set-password link has expired");
    assert!(!h.store.user(owner_id).password_set);
}

#[tokio::test]
async fn test_resend_invalidates_previous_token() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    let first = h.gateway.last_token();

    assert!(h.resend(&owner, member_id).await.unwrap());
    let second = h.gateway.last_token();
    assert_ne!(first, second);
    assert_eq!(h.gateway.last().kind, SetPasswordEmailKind::Reset);

    assert!(h.set_password(member_id, first).await.is_err());
    h.set_password(member_id, second).await.unwrap();
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_system_login_skips_membership_lookup() {
    let h = Harness::new();
    h.super_admin().await;
    let before = h.store.membership_lookups.load(Ordering::SeqCst);

    let output = h.login(" ROOT@platform.io ", ADMIN_PASSWORD).await.unwrap();

    assert_eq!(output.access_token.scope, TokenScope::System);
    assert_eq!(output.business_id, None);
    assert_eq!(h.store.membership_lookups.load(Ordering::SeqCst), before);

    let claims = h.services.tokens.validate(&output.access_token.token).unwrap();
    assert_eq!(claims.claims.scope, TokenScope::System);
    assert_eq!(claims.claims.business_id, None);
}

#[tokio::test]
async fn test_login_uses_uniform_failure_message() {
    let h = Harness::new();
    h.super_admin().await;

    let unknown = h.login("nobody@platform.io", ADMIN_PASSWORD).await.unwrap_err();
    let wrong = h.login(ADMIN_EMAIL, "Wrong-Password-123").await.unwrap_err();
    let malformed = h.login("not-an-email", ADMIN_PASSWORD).await.unwrap_err();

    for err in [&unknown, &wrong, &malformed] {
        assert!(matches!(err, AuthError::Unauthorized(_)));
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}

#[tokio::test]
async fn test_login_without_password_fails() {
    let h = Harness::new();
    h.business_with_member(TenantRole::Member).await;

    let err = h.login("max@acme.com", MEMBER_PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_first_login_verifies_membership_once() {
    let h = Harness::new();
    let (business_id, _, member_id) = h.business_with_member(TenantRole::Staff).await;
    h.set_password(member_id, h.gateway.last_token()).await.unwrap();
    assert!(!h.store.membership(member_id).is_verified);

    let output = h.login("max@acme.com", MEMBER_PASSWORD).await.unwrap();
    assert_eq!(output.business_id, Some(business_id));
    assert_eq!(output.business_role, Some(TenantRole::Staff));
    assert!(h.store.membership(member_id).is_verified);
    assert_eq!(h.store.audit_count(AuditAction::VerifyUser), 1);

    h.login("max@acme.com", MEMBER_PASSWORD).await.unwrap();
    assert_eq!(h.store.audit_count(AuditAction::VerifyUser), 1);

    let claims = h.services.tokens.validate(&output.access_token.token).unwrap();
    assert_eq!(claims.claims.business_id, Some(business_id.into_uuid()));
    assert_eq!(claims.claims.business_role, Some(TenantRole::Staff));
}

#[tokio::test]
async fn test_suspended_member_cannot_log_in() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    h.set_password(member_id, h.gateway.last_token()).await.unwrap();

    h.team()
        .toggle_status(&owner, member_id, false)
        .await
        .unwrap();

    let err = h.login("max@acme.com", MEMBER_PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_soft_deleted_business_blocks_members() {
    let h = Harness::new();
    let (business_id, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    h.set_password(member_id, h.gateway.last_token()).await.unwrap();
    h.login("max@acme.com", MEMBER_PASSWORD).await.unwrap();

    h.store.edit_business(business_id, |business| business.is_deleted = true);

    let err = h.login("max@acme.com", MEMBER_PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(ref m) if m == "Business access denied"));
    assert!(matches!(
        h.actor(owner.user_id()).await.unwrap_err(),
        AuthError::Unauthorized(_)
    ));

    let err = AuditTrailUseCase::new(h.store.clone())
        .list(&owner, business_id, PageRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));

    let err = BusinessDetailsUseCase::new(h.store.clone())
        .get(&owner, business_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

// ============================================================================
// Store uniqueness
// ============================================================================

#[tokio::test]
async fn test_email_race_surfaces_store_conflict() {
    let h = Harness::new();
    let (_, owner, _) = h.business_with_member(TenantRole::Member).await;
    let admin = h.super_admin().await;
    h.store.stale_email_check.store(true, Ordering::SeqCst);
    let (users, memberships) = h.store.with_state(|s| (s.users.len(), s.memberships.len()));

    let err = h
        .invite(&owner, "max@acme.com", TenantRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(ref m) if m.contains("email")));

    let err = h
        .register(&admin, "Globex", "owner@acme.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(ref m) if m.contains("email")));

    h.store.with_state(|s| {
        assert_eq!(s.users.len(), users);
        assert_eq!(s.memberships.len(), memberships);
        assert_eq!(s.businesses.len(), 1);
    });
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_soft_deleted_user_frees_email() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    h.store.edit_user(member_id, |user| user.is_deleted = true);
    h.store.with_state(|s| {
        if let Some(m) = s.memberships.iter_mut().find(|m| m.user_id == member_id) {
            m.is_deleted = true;
        }
    });

    let rejoined = h
        .invite(&owner, "max@acme.com", TenantRole::Staff)
        .await
        .unwrap();
    assert_ne!(rejoined, member_id);

    let admin = h.super_admin().await;
    h.store.edit_user(owner.user_id(), |user| user.is_deleted = true);
    h.register(&admin, "Globex", "owner@acme.com").await.unwrap();
}

// ============================================================================
// Invitations and resends
// ============================================================================

#[tokio::test]
async fn test_invite_records_audit_and_email() {
    let h = Harness::new();
    let (business_id, owner, member_id) = h.business_with_member(TenantRole::Admin).await;

    let membership = h.store.membership(member_id);
    assert_eq!(membership.business_id, business_id);
    assert_eq!(membership.role, TenantRole::Admin);
    assert!(membership.is_active);
    assert!(!membership.is_verified);

    h.store.with_state(|s| {
        let invite = s
            .audit_logs
            .iter()
            .find(|l| l.action == AuditAction::Invite)
            .unwrap();
        assert_eq!(invite.entity_id, member_id.into_uuid());
        assert_eq!(invite.user_id, owner.user_id());
        assert_eq!(invite.business_id, Some(business_id));
    });
    assert_eq!(h.gateway.last().kind, SetPasswordEmailKind::Invitation);
    assert!(h.store.user(member_id).credentials_email_sent);
}

#[tokio::test]
async fn test_member_cannot_invite() {
    let h = Harness::new();
    let (_, _, member_id) = h.business_with_member(TenantRole::Member).await;
    let member = h.actor(member_id).await.unwrap();

    let err = h
        .invite(&member, "other@acme.com", TenantRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_invite_rejects_owner_role_and_duplicates() {
    let h = Harness::new();
    let (_, owner, _) = h.business_with_member(TenantRole::Member).await;

    let err = h
        .invite(&owner, "second-owner@acme.com", TenantRole::Owner)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidOperation(_)));

    let err = h
        .invite(&owner, "MAX@acme.com", TenantRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[tokio::test]
async fn test_platform_admin_cannot_invite() {
    let h = Harness::new();
    let admin = h.super_admin().await;

    let err = h
        .invite(&admin, "max@acme.com", TenantRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_owner_cannot_reset_own_password() {
    let h = Harness::new();
    let (_, owner, _) = h.business_with_member(TenantRole::Member).await;

    let err = h.resend(&owner, owner.user_id()).await.unwrap_err();
    assert_eq!(err.to_string(), "You cannot reset your own password");
}

#[tokio::test]
async fn test_resend_across_businesses_is_denied() {
    let h = Harness::new();
    let admin = h.super_admin().await;
    let (_, acme_owner_id) = h.register(&admin, "Acme", "owner@acme.com").await.unwrap();
    let (_, globex_owner_id) = h.register(&admin, "Globex", "hank@globex.com").await.unwrap();
    let acme_owner = h.actor(acme_owner_id).await.unwrap();

    let err = h.resend(&acme_owner, globex_owner_id).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));

    let err = h.resend(&acme_owner, UserId::new()).await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound(_)));

    assert!(h.resend(&admin, globex_owner_id).await.unwrap());
}

#[tokio::test]
async fn test_resend_per_target_cap_blocks_before_writes() {
    let h = Harness::new();
    let (business_id, owner, member_id) = h.business_with_member(TenantRole::Member).await;

    h.store.with_state(|s| {
        for hours_ago in 1..=3 {
            let mut log = AuditLog::new(
                AuditAction::ResendPassword,
                audit_entity::USER,
                member_id,
                UserId::new(),
                Some(business_id),
                "former-admin@acme.com",
            );
            log.timestamp = Utc::now() - TimeDelta::hours(hours_ago);
            s.audit_logs.push(log);
        }
    });
    let writes = h.store.writes.load(Ordering::SeqCst);
    let emails = h.gateway.count();

    let err = h.resend(&owner, member_id).await.unwrap_err();

    assert!(matches!(err, AuthError::RateLimited(_)));
    assert_eq!(h.store.writes.load(Ordering::SeqCst), writes);
    assert_eq!(h.gateway.count(), emails);
}

#[tokio::test]
async fn test_resend_cooldown_per_pair() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;

    h.resend(&owner, member_id).await.unwrap();
    let err = h.resend(&owner, member_id).await.unwrap_err();

    assert!(matches!(err, AuthError::RateLimited(ref m) if m.contains("wait")));
    assert_eq!(h.store.audit_count(AuditAction::ResetPasswordLink), 1);
}

#[tokio::test]
async fn test_resend_per_admin_cap() {
    let h = Harness::new();
    let (business_id, owner, member_id) = h.business_with_member(TenantRole::Member).await;

    h.store.with_state(|s| {
        for _ in 0..10 {
            s.audit_logs.push(AuditLog::new(
                AuditAction::ResetPasswordLink,
                audit_entity::USER,
                UserId::new(),
                owner.user_id(),
                Some(business_id),
                owner.email.as_str(),
            ));
        }
    });

    let err = h.resend(&owner, member_id).await.unwrap_err();
    assert!(matches!(err, AuthError::RateLimited(ref m) if m.contains("per")));
}

#[tokio::test]
async fn test_resend_ignores_rows_outside_windows() {
    let h = Harness::new();
    let (business_id, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    let resend_row = |action, target: UserId, by: UserId, age: TimeDelta| {
        let mut log = AuditLog::new(
            action,
            audit_entity::USER,
            target,
            by,
            Some(business_id),
            "someone@acme.com",
        );
        log.timestamp = Utc::now() - age;
        log
    };

    for hours in 25..=27 {
        h.store.push_audit(resend_row(
            AuditAction::ResendPassword,
            member_id,
            UserId::new(),
            TimeDelta::hours(hours),
        ));
    }
    for _ in 0..10 {
        h.store.push_audit(resend_row(
            AuditAction::ResetPasswordLink,
            UserId::new(),
            owner.user_id(),
            TimeDelta::hours(2),
        ));
    }
    h.store.push_audit(resend_row(
        AuditAction::ResetPasswordLink,
        member_id,
        owner.user_id(),
        TimeDelta::minutes(6),
    ));

    assert!(h.resend(&owner, member_id).await.unwrap());
    assert_eq!(h.gateway.last().kind, SetPasswordEmailKind::Reset);
}

// ============================================================================
// Team management
// ============================================================================

#[tokio::test]
async fn test_owner_membership_is_immutable() {
    let h = Harness::new();
    let (_, owner, admin_id) = h.business_with_member(TenantRole::Admin).await;
    let team_admin = h.actor(admin_id).await.unwrap();

    assert!(
        h.team()
            .toggle_status(&team_admin, owner.user_id(), false)
            .await
            .is_err()
    );
    assert!(
        h.team()
            .change_role(&team_admin, owner.user_id(), TenantRole::Member)
            .await
            .is_err()
    );
    assert!(
        h.team()
            .toggle_status(&owner, owner.user_id(), false)
            .await
            .is_err()
    );
    assert!(
        h.team()
            .change_role(&owner, owner.user_id(), TenantRole::Admin)
            .await
            .is_err()
    );

    let stored = h.store.membership(owner.user_id());
    assert!(stored.is_active);
    assert_eq!(stored.role, TenantRole::Owner);
}

#[tokio::test]
async fn test_toggle_status_writes_audit_only_on_change() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;

    let membership = h
        .team()
        .toggle_status(&owner, member_id, true)
        .await
        .unwrap();
    assert!(membership.is_active);
    assert_eq!(h.store.audit_count(AuditAction::ActivateUser), 0);

    h.team()
        .toggle_status(&owner, member_id, false)
        .await
        .unwrap();
    assert!(!h.store.membership(member_id).is_active);
    assert_eq!(h.store.audit_count(AuditAction::SuspendUser), 1);

    h.team()
        .toggle_status(&owner, member_id, true)
        .await
        .unwrap();
    assert!(h.store.membership(member_id).is_active);
    assert_eq!(h.store.audit_count(AuditAction::ActivateUser), 1);
}

#[tokio::test]
async fn test_change_role_rules() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;

    let updated = h
        .team()
        .change_role(&owner, member_id, TenantRole::Admin)
        .await
        .unwrap();
    assert_eq!(updated.role, TenantRole::Admin);
    assert_eq!(h.store.audit_count(AuditAction::ChangeRole), 1);

    let err = h
        .team()
        .change_role(&owner, member_id, TenantRole::Admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidOperation(_)));

    let err = h
        .team()
        .change_role(&owner, member_id, TenantRole::Owner)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidOperation(_)));

    let promoted = h.actor(member_id).await.unwrap();
    let err = h
        .team()
        .change_role(&promoted, owner.user_id(), TenantRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_team_listing_is_tenant_scoped() {
    let h = Harness::new();
    let (_, owner, _) = h.business_with_member(TenantRole::Member).await;
    let admin = h.super_admin().await;
    h.register(&admin, "Globex", "hank@globex.com").await.unwrap();

    let team = h
        .team()
        .list_team(&owner, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(team.total_count, 2);
    assert!(team.items.iter().any(|m| m.membership.role == TenantRole::Owner));
    assert!(team.items.iter().all(|m| m.email.as_str().ends_with("@acme.com")));

    let err = h
        .team()
        .list_team(&admin, PageRequest::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_team_listing_requires_owner_or_admin() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    let staff_id = h.invite(&owner, "sam@acme.com", TenantRole::Staff).await.unwrap();
    let admin_id = h.invite(&owner, "ada@acme.com", TenantRole::Admin).await.unwrap();

    for denied in [member_id, staff_id] {
        let actor = h.actor(denied).await.unwrap();
        let err = h
            .team()
            .list_team(&actor, PageRequest::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    let team_admin = h.actor(admin_id).await.unwrap();
    let team = h
        .team()
        .list_team(&team_admin, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(team.total_count, 4);
}

#[tokio::test]
async fn test_team_listing_pages_and_searches() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    h.invite(&owner, "sam@acme.com", TenantRole::Staff).await.unwrap();
    h.store.edit_user(member_id, |user| user.full_name = "Grace Hopper".into());

    let first = h
        .team()
        .list_team(&owner, PageRequest::new(Some(1), Some(2)), None)
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total_count, 3);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items[0].membership.role, TenantRole::Owner);

    let second = h
        .team()
        .list_team(&owner, PageRequest::new(Some(2), Some(2)), None)
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);

    let by_name = h
        .team()
        .list_team(&owner, PageRequest::default(), Some("  HOPPER "))
        .await
        .unwrap();
    assert_eq!(by_name.total_count, 1);
    assert_eq!(by_name.items[0].membership.user_id, member_id);

    let by_email = h
        .team()
        .list_team(&owner, PageRequest::default(), Some("sam@"))
        .await
        .unwrap();
    assert_eq!(by_email.total_count, 1);

    let blank = h
        .team()
        .list_team(&owner, PageRequest::default(), Some("   "))
        .await
        .unwrap();
    assert_eq!(blank.total_count, 3);
}

// ============================================================================
// Passwords and tokens
// ============================================================================

#[tokio::test]
async fn test_change_password() {
    let h = Harness::new();
    let (_, _, member_id) = h.business_with_member(TenantRole::Member).await;
    h.set_password(member_id, h.gateway.last_token()).await.unwrap();
    let member = h.actor(member_id).await.unwrap();
    let use_case = ChangePasswordUseCase::new(h.store.clone(), h.services.clone());

    let err = use_case
        .execute(
            &member,
            ChangePasswordInput {
                current_password: "Not-The-Password-1".into(),
                new_password: "Green-Lantern-Evening-4".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));

    let err = use_case
        .execute(
            &member,
            ChangePasswordInput {
                current_password: MEMBER_PASSWORD.into(),
                new_password: MEMBER_PASSWORD.into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidOperation(_)));

    use_case
        .execute(
            &member,
            ChangePasswordInput {
                current_password: MEMBER_PASSWORD.into(),
                new_password: "Green-Lantern-Evening-4".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(h.store.audit_count(AuditAction::ChangePassword), 1);
    assert!(h.login("max@acme.com", MEMBER_PASSWORD).await.is_err());
    h.login("max@acme.com", "Green-Lantern-Evening-4")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bearer_issued_before_password_change_is_rejected() {
    let h = Harness::new();
    let (_, _, member_id) = h.business_with_member(TenantRole::Member).await;
    h.set_password(member_id, h.gateway.last_token()).await.unwrap();
    let output = h.login("max@acme.com", MEMBER_PASSWORD).await.unwrap();
    let resolver = IdentityResolver::new(h.store.clone(), h.services.clone());

    let actor = resolver
        .resolve_bearer(&output.access_token.token)
        .await
        .unwrap();
    assert_eq!(actor.user_id(), member_id);

    h.store.edit_user(member_id, |user| {
        user.password_changed_at = Some(Utc::now() + TimeDelta::seconds(5));
    });
    let err = resolver
        .resolve_bearer(&output.access_token.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_seed_super_admin_is_idempotent() {
    let h = Harness::new();
    let seed = SeedSuperAdminUseCase::new(h.store.clone(), h.services.clone());
    let input = || SeedSuperAdminInput {
        email: ADMIN_EMAIL.into(),
        full_name: "Root".into(),
        password: ADMIN_PASSWORD.into(),
    };

    assert!(seed.execute(input()).await.unwrap());
    assert!(!seed.execute(input()).await.unwrap());
    assert_eq!(h.store.audit_count(AuditAction::SeedSuperAdmin), 1);
}

// ============================================================================
// Audit trail
// ============================================================================

#[tokio::test]
async fn test_audit_trail_is_paged_and_scoped() {
    let h = Harness::new();
    let admin = h.super_admin().await;
    let (acme_id, acme_owner_id) = h.register(&admin, "Acme", "owner@acme.com").await.unwrap();
    let (globex_id, _) = h.register(&admin, "Globex", "hank@globex.com").await.unwrap();
    let acme_owner = h.actor(acme_owner_id).await.unwrap();
    h.invite(&acme_owner, "max@acme.com", TenantRole::Member)
        .await
        .unwrap();

    let trail = AuditTrailUseCase::new(h.store.clone());

    let page = trail
        .list(&acme_owner, acme_id, PageRequest::new(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, 4);
    assert_eq!(page.total_pages, 2);
    assert!(page.items[0].timestamp >= page.items[1].timestamp);
    assert!(page.items.iter().all(|l| l.business_id == Some(acme_id)));

    let err = trail
        .list(&acme_owner, globex_id, PageRequest::new(None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));

    let page = trail
        .list(&admin, globex_id, PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn test_system_audit_trail_is_admin_only() {
    let h = Harness::new();
    let (_, owner, _) = h.business_with_member(TenantRole::Member).await;
    let admin = h.actor(h.store.user_id_of(ADMIN_EMAIL)).await.unwrap();
    let trail = AuditTrailUseCase::new(h.store.clone());

    let page = trail.list_system(&admin, PageRequest::default()).await.unwrap();
    let total = h.store.with_state(|s| s.audit_logs.len()) as u64;
    assert_eq!(page.total_count, total);
    assert!(page.items.iter().any(|l| l.action == AuditAction::SeedSuperAdmin));
    assert!(page.items.iter().any(|l| l.business_id.is_none()));

    let err = trail
        .list_system(&owner, PageRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_profile_read_and_update() {
    let h = Harness::new();
    let (business_id, _, member_id) = h.business_with_member(TenantRole::Member).await;
    let member = h.actor(member_id).await.unwrap();
    let profile = ProfileUseCase::new(h.store.clone());

    let me = profile.get(&member).await.unwrap();
    assert_eq!(me.email.as_str(), "max@acme.com");

    let writes = h.store.writes.load(Ordering::SeqCst);
    profile
        .update(
            &member,
            UpdateProfileInput {
                full_name: Some("  ".into()),
                email: Some("MAX@acme.com".into()),
                phone: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(h.store.writes.load(Ordering::SeqCst), writes);
    assert_eq!(h.store.audit_count(AuditAction::UpdateProfile), 0);

    let updated = profile
        .update(
            &member,
            UpdateProfileInput {
                full_name: Some("Max Planck".into()),
                email: Some("planck@acme.com".into()),
                phone: Some("+1 555 0100".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Max Planck");
    assert_eq!(h.store.user(member_id).email.as_str(), "planck@acme.com");

    h.store.with_state(|s| {
        let log = s
            .audit_logs
            .iter()
            .find(|l| l.action == AuditAction::UpdateProfile)
            .unwrap();
        assert_eq!(log.entity_id, member_id.into_uuid());
        assert_eq!(log.business_id, Some(business_id));
    });

    h.set_password(member_id, h.gateway.last_token()).await.unwrap();
    h.login("planck@acme.com", MEMBER_PASSWORD).await.unwrap();
}

#[tokio::test]
async fn test_profile_email_change_conflicts() {
    let h = Harness::new();
    let (_, _, member_id) = h.business_with_member(TenantRole::Member).await;
    let member = h.actor(member_id).await.unwrap();
    let profile = ProfileUseCase::new(h.store.clone());

    let err = profile
        .update(
            &member,
            UpdateProfileInput {
                email: Some("owner@acme.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));

    let err = profile
        .update(
            &member,
            UpdateProfileInput {
                email: Some("not-an-email".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::BadRequest(_)));
    assert_eq!(h.store.user(member_id).email.as_str(), "max@acme.com");
}

// ============================================================================
// Platform directory and business details
// ============================================================================

#[tokio::test]
async fn test_user_directory_is_admin_only() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    let admin = h.actor(h.store.user_id_of(ADMIN_EMAIL)).await.unwrap();
    h.store.edit_user(member_id, |user| {
        user.system_role = SystemRole::Admin;
        user.full_name = "Ada Lovelace".into();
    });
    let directory = UserDirectoryUseCase::new(h.store.clone());

    let everyone = directory
        .list_users(&admin, PageRequest::default(), None, None)
        .await
        .unwrap();
    assert_eq!(everyone.total_count, 3);
    assert_eq!(everyone.items[0].full_name, "Ada Lovelace");

    let plain = directory
        .list_users(&admin, PageRequest::default(), None, Some(SystemRole::User))
        .await
        .unwrap();
    assert_eq!(plain.total_count, 1);
    assert_eq!(plain.items[0].user_id, owner.user_id());

    let admins = directory
        .list_admins(&admin, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(admins.total_count, 2);

    let searched = directory
        .list_admins(&admin, PageRequest::default(), Some("lovelace"))
        .await
        .unwrap();
    assert_eq!(searched.total_count, 1);

    h.store.edit_user(member_id, |user| user.is_deleted = true);
    let admins = directory
        .list_admins(&admin, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(admins.total_count, 1);

    let err = directory
        .list_users(&owner, PageRequest::default(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
}

#[tokio::test]
async fn test_business_details_are_scoped() {
    let h = Harness::new();
    let (acme_id, acme_owner, member_id) = h.business_with_member(TenantRole::Staff).await;
    let admin = h.actor(h.store.user_id_of(ADMIN_EMAIL)).await.unwrap();
    let (globex_id, _) = h.register(&admin, "Globex", "hank@globex.com").await.unwrap();
    let details = BusinessDetailsUseCase::new(h.store.clone());

    assert_eq!(details.get(&acme_owner, acme_id).await.unwrap().name, "Acme");
    let staff = h.actor(member_id).await.unwrap();
    assert_eq!(details.get(&staff, acme_id).await.unwrap().business_id, acme_id);

    let err = details.get(&acme_owner, globex_id).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));

    assert_eq!(details.get(&admin, globex_id).await.unwrap().name, "Globex");
    let err = details.get(&admin, BusinessId::new()).await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound(_)));
}

// ============================================================================
// HTTP surface
// ============================================================================

fn app(h: &Harness) -> axum::Router {
    let state = AuthAppState {
        store: h.store.clone(),
        gateway: h.gateway.clone(),
        services: h.services.clone(),
    };
    axum::Router::new()
        .nest("/api/auth", auth_router(state.clone()))
        .nest("/api/business", business_router(state.clone()))
        .nest("/api/users", user_router(state.clone()))
        .nest("/api/admin", admin_router(state))
}

fn bearer_for(h: &Harness, user_id: UserId) -> String {
    let user = h.store.user(user_id);
    let tokens = &h.services.tokens;
    let issued = if user.is_platform_admin() {
        tokens.issue_system(&user)
    } else {
        tokens.issue_tenant(&user, &h.store.membership(user_id))
    };
    format!("Bearer {}", issued.unwrap().token)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_http_login_and_protected_route() {
    let h = Harness::new();
    h.super_admin().await;

    let response = app(&h)
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"email":"{ADMIN_EMAIL}","password":"{ADMIN_PASSWORD}"}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["scope"], "System");
    let token = body["accessToken"].as_str().unwrap().to_string();

    let response = app(&h)
        .oneshot(
            Request::post("/api/auth/register-business")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    r#"{"businessName":"Acme","businessEmail":"billing@acme.com","ownerFullName":"Olivia Owner","ownerEmail":"owner@acme.com"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["businessName"], "Acme");
    assert_eq!(body["owner"]["email"], "owner@acme.com");
    assert_eq!(body["emailSent"], true);
}

#[tokio::test]
async fn test_http_protected_routes_require_bearer() {
    let h = Harness::new();

    let response = app(&h)
        .oneshot(
            Request::get("/api/business/team")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&h)
        .oneshot(
            Request::post("/api/auth/invite")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"fullName":"Max","email":"max@acme.com","role":"Member"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_http_rate_limited_maps_to_429() {
    let h = Harness::new();
    let (_, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    h.resend(&owner, member_id).await.unwrap();

    let response = app(&h)
        .oneshot(
            Request::post(format!("/api/auth/resend-credentials/{member_id}"))
                .header(header::AUTHORIZATION, bearer_for(&h, owner.user_id()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_http_profile_and_admin_routes() {
    let h = Harness::new();
    let (business_id, owner, member_id) = h.business_with_member(TenantRole::Member).await;
    let admin_id = h.store.user_id_of(ADMIN_EMAIL);

    let response = app(&h)
        .oneshot(
            Request::patch("/api/users/me")
                .header(header::AUTHORIZATION, bearer_for(&h, owner.user_id()))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"phone":"+1 555 0199"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["phone"], "+1 555 0199");
    assert_eq!(body["businessRole"], "Owner");
    assert_eq!(body["businessId"], business_id.to_string());

    let response = app(&h)
        .oneshot(
            Request::get("/api/business/team?pageSize=1")
                .header(header::AUTHORIZATION, bearer_for(&h, member_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&h)
        .oneshot(
            Request::get(format!("/api/business/{business_id}"))
                .header(header::AUTHORIZATION, bearer_for(&h, owner.user_id()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Acme");

    let response = app(&h)
        .oneshot(
            Request::get("/api/admin/audit-logs?pageSize=2")
                .header(header::AUTHORIZATION, bearer_for(&h, owner.user_id()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&h)
        .oneshot(
            Request::get("/api/admin/audit-logs?pageSize=2")
                .header(header::AUTHORIZATION, bearer_for(&h, admin_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["pageSize"], 2);

    let response = app(&h)
        .oneshot(
            Request::get("/api/admin/users?role=user&search=acme")
                .header(header::AUTHORIZATION, bearer_for(&h, admin_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["totalCount"], 2);
}
