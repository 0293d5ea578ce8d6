//! PostgreSQL Repository Implementations
//!
//! Soft-delete filtering lives here and nowhere else: user lookups filter
//! `users.is_deleted`, and every membership lookup goes through
//! [`MEMBERSHIP_SCOPE`], which also hides memberships of deleted businesses.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::{
    audit_log::AuditLog,
    business::Business,
    business_user::{BusinessUser, TeamMember},
    user::User,
};
use crate::domain::repository::{
    AuditLogRepository, AuditQuery, BusinessRepository, CredentialStore, MembershipRepository,
    RateLimitLedger, UserFilter, UserRepository,
};
use crate::domain::value_object::{
    audit_action::AuditAction,
    email::Email,
    ids::{AuditLogId, BusinessId, MembershipId, UserId},
    set_password_token::TokenHash,
    subscription_plan::SubscriptionPlan,
    system_role::SystemRole,
    tenant_role::TenantRole,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// Live membership in a live business
const MEMBERSHIP_SCOPE: &str = "bu.is_deleted = FALSE AND b.is_deleted = FALSE";

const USER_COLUMNS: &str = r#"
    user_id,
    full_name,
    email,
    password_hash,
    phone,
    system_role,
    is_deleted,
    reset_token_hash,
    reset_token_expires_at,
    password_set,
    password_changed_at,
    credentials_email_sent,
    created_at,
    updated_at
"#;

const AUDIT_COLUMNS: &str = r#"
    audit_log_id,
    action,
    entity_name,
    entity_id,
    user_id,
    business_id,
    change_by,
    timestamp
"#;

/// Membership select over `business_users bu JOIN businesses b`, scoped
fn membership_query(filter: &str) -> String {
    format!(
        r#"
        SELECT
            bu.membership_id,
            bu.business_id,
            bu.user_id,
            bu.role,
            bu.is_active,
            bu.is_verified,
            bu.is_deleted,
            bu.joined_at
        FROM business_users bu
        JOIN businesses b ON b.business_id = bu.business_id
        WHERE {MEMBERSHIP_SCOPE} AND {filter}
        "#
    )
}

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Shared statements (run on a pool connection or inside a transaction)
// ============================================================================

async fn insert_user_row(conn: &mut PgConnection, user: &User) -> AuthResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (
            user_id,
            full_name,
            email,
            password_hash,
            phone,
            system_role,
            is_deleted,
            reset_token_hash,
            reset_token_expires_at,
            password_set,
            password_changed_at,
            credentials_email_sent,
            created_at,
            updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(user.user_id.as_uuid())
    .bind(&user.full_name)
    .bind(user.email.as_str())
    .bind(user.password.as_ref().map(|p| p.as_phc_string()))
    .bind(&user.phone)
    .bind(user.system_role.code())
    .bind(user.is_deleted)
    .bind(user.reset_token_hash.as_ref().map(|h| h.as_phc_string()))
    .bind(user.reset_token_expires_at)
    .bind(user.password_set)
    .bind(user.password_changed_at)
    .bind(user.credentials_email_sent)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

async fn insert_membership_row(conn: &mut PgConnection, membership: &BusinessUser) -> AuthResult<()> {
    sqlx::query(
        r#"
        INSERT INTO business_users (
            membership_id,
            business_id,
            user_id,
            role,
            is_active,
            is_verified,
            is_deleted,
            joined_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(membership.membership_id.as_uuid())
    .bind(membership.business_id.as_uuid())
    .bind(membership.user_id.as_uuid())
    .bind(membership.role.code())
    .bind(membership.is_active)
    .bind(membership.is_verified)
    .bind(membership.is_deleted)
    .bind(membership.joined_at)
    .execute(conn)
    .await?;

    Ok(())
}

async fn insert_audit_row(conn: &mut PgConnection, audit: &AuditLog) -> AuthResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (
            audit_log_id,
            action,
            entity_name,
            entity_id,
            user_id,
            business_id,
            change_by,
            timestamp
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(audit.audit_log_id.as_uuid())
    .bind(audit.action.code())
    .bind(&audit.entity_name)
    .bind(audit.entity_id)
    .bind(audit.user_id.as_uuid())
    .bind(audit.business_id.map(BusinessId::into_uuid))
    .bind(&audit.change_by)
    .bind(audit.timestamp)
    .execute(conn)
    .await?;

    Ok(())
}

/// `term` is lowercase; emails are stored lowercase
fn push_search(
    builder: &mut QueryBuilder<'_, Postgres>,
    name_column: &str,
    email_column: &str,
    term: &str,
) {
    let pattern = format!("%{}%", escape_like(term));
    builder
        .push(format!(" AND (LOWER({name_column}) LIKE "))
        .push_bind(pattern.clone())
        .push(format!(" OR {email_column} LIKE "))
        .push_bind(pattern)
        .push(")");
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_user_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    builder.push(" WHERE is_deleted = FALSE");

    if !filter.roles.is_empty() {
        let codes: Vec<String> = filter.roles.iter().map(|r| r.code().to_string()).collect();
        builder.push(" AND system_role = ANY(").push_bind(codes).push(")");
    }
    if let Some(term) = filter.search.as_deref() {
        push_search(builder, "full_name", "email", term);
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgCredentialStore {
    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn user_email_exists(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND is_deleted = FALSE)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<User>, u64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_user_filter(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_user_filter(&mut select, filter);
        select
            .push(" ORDER BY full_name, created_at LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = select
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(UserRow::into_user)
            .collect::<AuthResult<Vec<_>>>()?;

        Ok((items, total.max(0) as u64))
    }

    async fn insert_user(&self, user: &User, audit: &AuditLog) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_user_row(&mut tx, user).await?;
        insert_audit_row(&mut tx, audit).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn update_user(&self, user: &User, audit: &AuditLog) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE users SET
                full_name = $2,
                email = $3,
                password_hash = $4,
                phone = $5,
                system_role = $6,
                reset_token_hash = $7,
                reset_token_expires_at = $8,
                password_set = $9,
                password_changed_at = $10,
                credentials_email_sent = $11,
                updated_at = $12
            WHERE user_id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.full_name)
        .bind(user.email.as_str())
        .bind(user.password.as_ref().map(|p| p.as_phc_string()))
        .bind(&user.phone)
        .bind(user.system_role.code())
        .bind(user.reset_token_hash.as_ref().map(|h| h.as_phc_string()))
        .bind(user.reset_token_expires_at)
        .bind(user.password_set)
        .bind(user.password_changed_at)
        .bind(user.credentials_email_sent)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::not_found("User not found"));
        }

        insert_audit_row(&mut tx, audit).await?;
        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Business Repository Implementation
// ============================================================================

impl BusinessRepository for PgCredentialStore {
    async fn find_business_by_id(&self, business_id: &BusinessId) -> AuthResult<Option<Business>> {
        let row = sqlx::query_as::<_, BusinessRow>(
            r#"
            SELECT
                business_id,
                name,
                email,
                address,
                phone,
                plan,
                monthly_invoice_count,
                invoice_count_reset_at,
                is_multi_tenant,
                brand_color,
                logo_url,
                is_deleted,
                created_at
            FROM businesses
            WHERE business_id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(business_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(BusinessRow::into_business).transpose()
    }

    async fn business_name_exists(&self, name: &str) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM businesses WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Membership Repository Implementation
// ============================================================================

impl MembershipRepository for PgCredentialStore {
    async fn find_membership_by_user(&self, user_id: &UserId) -> AuthResult<Option<BusinessUser>> {
        let sql = membership_query("bu.user_id = $1");
        let row = sqlx::query_as::<_, MembershipRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(MembershipRow::into_membership).transpose()
    }

    async fn find_active_membership_by_user(
        &self,
        user_id: &UserId,
    ) -> AuthResult<Option<BusinessUser>> {
        let sql = membership_query("bu.user_id = $1 AND bu.is_active = TRUE");
        let row = sqlx::query_as::<_, MembershipRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(MembershipRow::into_membership).transpose()
    }

    async fn find_active_membership(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
    ) -> AuthResult<Option<BusinessUser>> {
        let sql = membership_query("bu.user_id = $1 AND bu.business_id = $2 AND bu.is_active = TRUE");
        let row = sqlx::query_as::<_, MembershipRow>(&sql)
            .bind(user_id.as_uuid())
            .bind(business_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(MembershipRow::into_membership).transpose()
    }

    async fn list_members(
        &self,
        business_id: &BusinessId,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<TeamMember>, u64)> {
        let scope = |builder: &mut QueryBuilder<'_, Postgres>| {
            builder
                .push(format!(
                    r#"
                    FROM business_users bu
                    JOIN businesses b ON b.business_id = bu.business_id
                    JOIN users u ON u.user_id = bu.user_id AND u.is_deleted = FALSE
                    WHERE {MEMBERSHIP_SCOPE} AND bu.business_id = "#
                ))
                .push_bind(business_id.into_uuid());
            if let Some(term) = search {
                push_search(builder, "u.full_name", "u.email", term);
            }
        };

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        scope(&mut count);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                bu.membership_id,
                bu.business_id,
                bu.user_id,
                bu.role,
                bu.is_active,
                bu.is_verified,
                bu.is_deleted,
                bu.joined_at,
                u.full_name,
                u.email
            "#,
        );
        scope(&mut select);
        select
            .push(" ORDER BY bu.joined_at LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = select
            .build_query_as::<TeamMemberRow>()
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(TeamMemberRow::into_team_member)
            .collect::<AuthResult<Vec<_>>>()?;

        Ok((items, total.max(0) as u64))
    }

    async fn update_membership(
        &self,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE business_users SET
                role = $2,
                is_active = $3,
                is_verified = $4
            WHERE membership_id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(membership.membership_id.as_uuid())
        .bind(membership.role.code())
        .bind(membership.is_active)
        .bind(membership.is_verified)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::not_found("Business user not found"));
        }

        insert_audit_row(&mut tx, audit).await?;
        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Credential Store Implementation (multi-entity transactions)
// ============================================================================

impl CredentialStore for PgCredentialStore {
    async fn register_business(
        &self,
        business: &Business,
        owner: &User,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO businesses (
                business_id,
                name,
                email,
                address,
                phone,
                plan,
                monthly_invoice_count,
                invoice_count_reset_at,
                is_multi_tenant,
                brand_color,
                logo_url,
                is_deleted,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(business.business_id.as_uuid())
        .bind(&business.name)
        .bind(business.email.as_str())
        .bind(&business.address)
        .bind(&business.phone)
        .bind(business.plan.code())
        .bind(business.monthly_invoice_count)
        .bind(business.invoice_count_reset_at)
        .bind(business.is_multi_tenant)
        .bind(&business.brand_color)
        .bind(&business.logo_url)
        .bind(business.is_deleted)
        .bind(business.created_at)
        .execute(&mut *tx)
        .await?;

        insert_user_row(&mut tx, owner).await?;
        insert_membership_row(&mut tx, membership).await?;
        insert_audit_row(&mut tx, audit).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn add_member(
        &self,
        user: &User,
        membership: &BusinessUser,
        audit: &AuditLog,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_user_row(&mut tx, user).await?;
        insert_membership_row(&mut tx, membership).await?;
        insert_audit_row(&mut tx, audit).await?;
        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Audit Log (rate-limit ledger and trail)
// ============================================================================

fn push_audit_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &AuditQuery) {
    builder.push(" WHERE TRUE");

    if !query.actions.is_empty() {
        let codes: Vec<String> = query.actions.iter().map(|a| a.code().to_string()).collect();
        builder.push(" AND action = ANY(").push_bind(codes).push(")");
    }
    if let Some(entity_id) = query.entity_id {
        builder.push(" AND entity_id = ").push_bind(entity_id);
    }
    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id.into_uuid());
    }
    if let Some(since) = query.since {
        builder.push(" AND timestamp >= ").push_bind(since);
    }
}

impl RateLimitLedger for PgCredentialStore {
    async fn count_audit_logs(&self, query: &AuditQuery) -> AuthResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM audit_logs");
        push_audit_filter(&mut builder, query);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn max_audit_log_timestamp(
        &self,
        query: &AuditQuery,
    ) -> AuthResult<Option<DateTime<Utc>>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT MAX(timestamp) FROM audit_logs");
        push_audit_filter(&mut builder, query);

        let latest = builder
            .build_query_scalar::<Option<DateTime<Utc>>>()
            .fetch_one(&self.pool)
            .await?;

        Ok(latest)
    }
}

impl AuditLogRepository for PgCredentialStore {
    async fn list_audit_logs(
        &self,
        business_id: Option<&BusinessId>,
        limit: i64,
        offset: i64,
    ) -> AuthResult<(Vec<AuditLog>, u64)> {
        let scope = |builder: &mut QueryBuilder<'_, Postgres>| {
            if let Some(business_id) = business_id {
                builder
                    .push(" WHERE business_id = ")
                    .push_bind(business_id.into_uuid());
            }
        };

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM audit_logs");
        scope(&mut count);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {AUDIT_COLUMNS} FROM audit_logs"));
        scope(&mut select);
        select
            .push(" ORDER BY timestamp DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = select
            .build_query_as::<AuditLogRow>()
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(AuditLogRow::into_audit_log)
            .collect::<AuthResult<Vec<_>>>()?;

        Ok((items, total.max(0) as u64))
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    full_name: String,
    email: String,
    password_hash: Option<String>,
    phone: Option<String>,
    system_role: String,
    is_deleted: bool,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    password_set: bool,
    password_changed_at: Option<DateTime<Utc>>,
    credentials_email_sent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let system_role = SystemRole::from_code(&self.system_role).ok_or_else(|| {
            AuthError::Internal(format!("Invalid system_role: {}", self.system_role))
        })?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            full_name: self.full_name,
            email: Email::from_db(self.email),
            password: self
                .password_hash
                .map(UserPassword::from_phc_string)
                .transpose()?,
            phone: self.phone,
            system_role,
            is_deleted: self.is_deleted,
            reset_token_hash: self
                .reset_token_hash
                .map(TokenHash::from_phc_string)
                .transpose()?,
            reset_token_expires_at: self.reset_token_expires_at,
            password_set: self.password_set,
            password_changed_at: self.password_changed_at,
            credentials_email_sent: self.credentials_email_sent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BusinessRow {
    business_id: Uuid,
    name: String,
    email: String,
    address: Option<String>,
    phone: Option<String>,
    plan: String,
    monthly_invoice_count: i32,
    invoice_count_reset_at: DateTime<Utc>,
    is_multi_tenant: bool,
    brand_color: Option<String>,
    logo_url: Option<String>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
}

impl BusinessRow {
    fn into_business(self) -> AuthResult<Business> {
        let plan = SubscriptionPlan::from_code(&self.plan)
            .ok_or_else(|| AuthError::Internal(format!("Invalid plan: {}", self.plan)))?;

        Ok(Business {
            business_id: BusinessId::from_uuid(self.business_id),
            name: self.name,
            email: Email::from_db(self.email),
            address: self.address,
            phone: self.phone,
            plan,
            monthly_invoice_count: self.monthly_invoice_count,
            invoice_count_reset_at: self.invoice_count_reset_at,
            is_multi_tenant: self.is_multi_tenant,
            brand_color: self.brand_color,
            logo_url: self.logo_url,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    membership_id: Uuid,
    business_id: Uuid,
    user_id: Uuid,
    role: String,
    is_active: bool,
    is_verified: bool,
    is_deleted: bool,
    joined_at: DateTime<Utc>,
}

impl MembershipRow {
    fn into_membership(self) -> AuthResult<BusinessUser> {
        let role = TenantRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role: {}", self.role)))?;

        Ok(BusinessUser {
            membership_id: MembershipId::from_uuid(self.membership_id),
            business_id: BusinessId::from_uuid(self.business_id),
            user_id: UserId::from_uuid(self.user_id),
            role,
            is_active: self.is_active,
            is_verified: self.is_verified,
            is_deleted: self.is_deleted,
            joined_at: self.joined_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TeamMemberRow {
    #[sqlx(flatten)]
    membership: MembershipRow,
    full_name: String,
    email: String,
}

impl TeamMemberRow {
    fn into_team_member(self) -> AuthResult<TeamMember> {
        Ok(TeamMember {
            membership: self.membership.into_membership()?,
            full_name: self.full_name,
            email: Email::from_db(self.email),
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuditLogRow {
    audit_log_id: Uuid,
    action: String,
    entity_name: String,
    entity_id: Uuid,
    user_id: Uuid,
    business_id: Option<Uuid>,
    change_by: String,
    timestamp: DateTime<Utc>,
}

impl AuditLogRow {
    fn into_audit_log(self) -> AuthResult<AuditLog> {
        Ok(AuditLog {
            audit_log_id: AuditLogId::from_uuid(self.audit_log_id),
            action: AuditAction::from_code(&self.action),
            entity_name: self.entity_name,
            entity_id: self.entity_id,
            user_id: UserId::from_uuid(self.user_id),
            business_id: self.business_id.map(BusinessId::from_uuid),
            change_by: self.change_by,
            timestamp: self.timestamp,
        })
    }
}
