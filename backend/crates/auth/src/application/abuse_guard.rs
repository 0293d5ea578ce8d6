//! Credential Resend Abuse Guard
//!
//! Bounds how often credentials can be re-issued, using resend-class audit
//! rows as the counter. Checks run in order and the first violation wins.
//! Reads are not serialized against concurrent resends, so two racing
//! requests can both pass the cooldown.

use chrono::{DateTime, Utc};
use platform::rate_limit::{RateLimitResult, describe_duration};

use crate::application::config::ResendPolicy;
use crate::domain::repository::{AuditQuery, RateLimitLedger};
use crate::domain::value_object::{audit_action::AuditAction, ids::UserId};
use crate::error::{AuthError, AuthResult};

pub async fn check_resend_allowed<S: RateLimitLedger>(
    ledger: &S,
    policy: &ResendPolicy,
    admin_id: UserId,
    target_id: UserId,
    now: DateTime<Utc>,
) -> AuthResult<()> {
    let resends = || AuditQuery::actions(AuditAction::RESEND_CLASS);

    let per_target = resends()
        .on_entity(target_id)
        .since(policy.per_target.window_start(now));
    let recorded = ledger.count_audit_logs(&per_target).await?;
    if let RateLimitResult::LimitExceeded { limit, window } = policy.per_target.check(recorded) {
        return Err(AuthError::RateLimited(format!(
            "Credentials for this user were already resent {limit} times in the last {}",
            describe_duration(window)
        )));
    }

    let per_admin = resends()
        .by_user(admin_id)
        .since(policy.per_admin.window_start(now));
    let recorded = ledger.count_audit_logs(&per_admin).await?;
    if let RateLimitResult::LimitExceeded { limit, window } = policy.per_admin.check(recorded) {
        return Err(AuthError::RateLimited(format!(
            "You can resend credentials at most {limit} times per {}",
            describe_duration(window)
        )));
    }

    let pair = resends().on_entity(target_id).by_user(admin_id);
    let last = ledger.max_audit_log_timestamp(&pair).await?;
    if let RateLimitResult::CoolingDown { retry_after } = policy.cooldown.check(last, now) {
        return Err(AuthError::RateLimited(format!(
            "Please wait {} before resending credentials to this user again",
            describe_duration(retry_after)
        )));
    }

    Ok(())
}
