//! User Entity
//!
//! Login identity. Users are created without a password by registration or
//! invitation and become password-capable only through the set-password flow.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, ids::UserId, set_password_token::TokenHash, system_role::SystemRole,
    user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub full_name: String,
    /// Normalized, globally unique
    pub email: Email,
    /// `None` until the user completes set-password
    pub password: Option<UserPassword>,
    pub phone: Option<String>,
    pub system_role: SystemRole,
    pub is_deleted: bool,
    pub reset_token_hash: Option<TokenHash>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub password_set: bool,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub credentials_email_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with no password
    pub fn new(
        full_name: impl Into<String>,
        email: Email,
        phone: Option<String>,
        system_role: SystemRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            full_name: full_name.into().trim().to_string(),
            email,
            password: None,
            phone,
            system_role,
            is_deleted: false,
            reset_token_hash: None,
            reset_token_expires_at: None,
            password_set: false,
            password_changed_at: None,
            credentials_email_sent: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store a fresh token hash, replacing any previous one
    pub fn issue_reset_token(&mut self, hash: TokenHash, expires_at: DateTime<Utc>) {
        self.reset_token_hash = Some(hash);
        self.reset_token_expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Pending token, if both halves are present
    pub fn pending_reset_token(&self) -> Option<(&TokenHash, DateTime<Utc>)> {
        match (&self.reset_token_hash, self.reset_token_expires_at) {
            (Some(hash), Some(expires_at)) => Some((hash, expires_at)),
            _ => None,
        }
    }

    /// Install a new password and burn any pending token
    pub fn set_password(&mut self, password: UserPassword) {
        let now = Utc::now();
        self.password = Some(password);
        self.password_set = true;
        self.password_changed_at = Some(now);
        self.reset_token_hash = None;
        self.reset_token_expires_at = None;
        self.updated_at = now;
    }

    pub fn record_credentials_email(&mut self, sent: bool) {
        self.credentials_email_sent = sent;
        self.updated_at = Utc::now();
    }

    /// Apply profile edits; returns `true` if anything changed
    pub fn update_profile(
        &mut self,
        full_name: Option<String>,
        email: Option<Email>,
        phone: Option<String>,
    ) -> bool {
        let mut changed = false;

        if let Some(full_name) = full_name.filter(|name| *name != self.full_name) {
            self.full_name = full_name;
            changed = true;
        }
        if let Some(email) = email.filter(|email| *email != self.email) {
            self.email = email;
            changed = true;
        }
        if let Some(phone) = phone.filter(|phone| self.phone.as_ref() != Some(phone)) {
            self.phone = Some(phone);
            changed = true;
        }

        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    pub fn is_platform_admin(&self) -> bool {
        self.system_role.is_platform_admin()
    }

    /// Tokens issued before the last password change are stale
    pub fn accepts_token_issued_at(&self, issued_at: DateTime<Utc>) -> bool {
        match self.password_changed_at {
            // JWT `iat` has second precision
            Some(changed_at) => issued_at.timestamp() >= changed_at.timestamp(),
            None => true,
        }
    }
}
