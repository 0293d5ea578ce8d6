use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::value_object::{
    audit_action::AuditAction,
    ids::{AuditLogId, BusinessId, UserId},
};

/// Descriptor used when no human actor is involved
pub const SYSTEM_ACTOR: &str = "System";

/// Append-only audit row
///
/// Resend-class rows double as the ledger for credential-reset rate limits:
/// `entity_id` is the target user and `user_id` the acting admin.
#[derive(Debug, Clone)]
pub struct AuditLog {
    pub audit_log_id: AuditLogId,
    pub action: AuditAction,
    pub entity_name: String,
    pub entity_id: Uuid,
    /// Acting user
    pub user_id: UserId,
    pub business_id: Option<BusinessId>,
    /// Actor email or [`SYSTEM_ACTOR`]
    pub change_by: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        action: AuditAction,
        entity_name: &str,
        entity_id: impl Into<Uuid>,
        user_id: UserId,
        business_id: Option<BusinessId>,
        change_by: impl Into<String>,
    ) -> Self {
        Self {
            audit_log_id: AuditLogId::new(),
            action,
            entity_name: entity_name.to_string(),
            entity_id: entity_id.into(),
            user_id,
            business_id,
            change_by: change_by.into(),
            timestamp: Utc::now(),
        }
    }
}
