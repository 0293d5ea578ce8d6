//! Set-Password Link
//!
//! Issuing a link is split in two so the token hash can be committed before
//! the email leaves: [`prepare`] mutates the user, [`send_set_password_link`]
//! delivers. Delivery never fails the caller; the outcome is recorded by
//! [`record_delivery`] in a second, smaller commit.

use chrono::Utc;
use std::fmt;

use crate::application::services::AuthServices;
use crate::domain::entity::{audit_log::AuditLog, user::User};
use crate::domain::notification::{NotificationGateway, SetPasswordEmail, SetPasswordEmailKind};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    audit_action::{AuditAction, audit_entity},
    set_password_token::SetPasswordToken,
};
use crate::error::AuthResult;

/// Link carrying a raw token; only lives for one request
pub struct SetPasswordLink {
    url: String,
}

impl SetPasswordLink {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for SetPasswordLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SetPasswordLink([REDACTED])")
    }
}

/// Generate a token, store its hash and expiry on `user`, and build the link.
///
/// Any previously issued token stops working once the user is persisted.
pub fn prepare(services: &AuthServices, user: &mut User) -> AuthResult<SetPasswordLink> {
    let token = SetPasswordToken::generate();
    let hash = token.hash(&services.hasher)?;
    let expires_at = Utc::now() + services.config.set_password_ttl();
    user.issue_reset_token(hash, expires_at);

    let url = format!(
        "{}/set-password?userId={}&token={}",
        services.config.frontend_base_url.trim_end_matches('/'),
        user.user_id,
        token.url_escaped()
    );

    Ok(SetPasswordLink { url })
}

/// Returns whether the gateway accepted the email
pub async fn send_set_password_link<N: NotificationGateway>(
    gateway: &N,
    user: &User,
    business_name: &str,
    link: &SetPasswordLink,
    kind: SetPasswordEmailKind,
) -> bool {
    let email = SetPasswordEmail {
        to: user.email.clone(),
        full_name: user.full_name.clone(),
        business_name: business_name.to_string(),
        link: link.url.clone(),
        kind,
    };

    match gateway.send_set_password_email(&email).await {
        Ok(()) => {
            tracing::info!(user_id = %user.user_id, kind = ?kind, "Set-password email sent");
            true
        }
        Err(e) => {
            tracing::warn!(
                user_id = %user.user_id,
                kind = ?kind,
                error = %e,
                "Set-password email failed"
            );
            false
        }
    }
}

/// Persist the delivery outcome, attributed like the `primary` audit row.
/// Failures are logged, never returned.
pub async fn record_delivery<S: UserRepository>(
    store: &S,
    user: &mut User,
    sent: bool,
    primary: &AuditLog,
) {
    user.record_credentials_email(sent);

    let audit = AuditLog::new(
        AuditAction::credentials_email(sent),
        audit_entity::USER,
        user.user_id,
        primary.user_id,
        primary.business_id,
        primary.change_by.clone(),
    );

    if let Err(e) = store.update_user(user, &audit).await {
        tracing::error!(
            user_id = %user.user_id,
            error = %e,
            "Failed to record credentials email status"
        );
    }
}
