use serde::{Deserialize, Serialize};
use std::fmt;

/// Action tag recorded in the audit log
///
/// The audit table is shared with the rest of the application, so reads keep
/// tags this module does not write as [`AuditAction::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditAction {
    CreateBusiness,
    Invite,
    CredentialsEmailSent,
    CredentialsEmailFailed,
    /// Tag used by older resend flows; still counted by the abuse guard.
    ResendPassword,
    ResetPasswordLink,
    SetPassword,
    ChangePassword,
    UpdateProfile,
    VerifyUser,
    ActivateUser,
    SuspendUser,
    ChangeRole,
    SeedSuperAdmin,
    /// Tag written by another part of the application
    Other(String),
}

impl AuditAction {
    /// Actions counted against the credential-resend limits
    pub const RESEND_CLASS: &'static [AuditAction] =
        &[AuditAction::ResendPassword, AuditAction::ResetPasswordLink];

    const KNOWN: [AuditAction; 14] = [
        AuditAction::CreateBusiness,
        AuditAction::Invite,
        AuditAction::CredentialsEmailSent,
        AuditAction::CredentialsEmailFailed,
        AuditAction::ResendPassword,
        AuditAction::ResetPasswordLink,
        AuditAction::SetPassword,
        AuditAction::ChangePassword,
        AuditAction::UpdateProfile,
        AuditAction::VerifyUser,
        AuditAction::ActivateUser,
        AuditAction::SuspendUser,
        AuditAction::ChangeRole,
        AuditAction::SeedSuperAdmin,
    ];

    pub fn code(&self) -> &str {
        use AuditAction::*;
        match self {
            CreateBusiness => "CREATE_BUSINESS",
            Invite => "INVITE",
            CredentialsEmailSent => "CREDENTIALS_EMAIL_SENT",
            CredentialsEmailFailed => "CREDENTIALS_EMAIL_FAILED",
            ResendPassword => "RESEND_PASSWORD",
            ResetPasswordLink => "RESET_PASSWORD_LINK",
            SetPassword => "SET_PASSWORD",
            ChangePassword => "CHANGE_PASSWORD",
            UpdateProfile => "UPDATE_PROFILE",
            VerifyUser => "VERIFY_USER",
            ActivateUser => "ACTIVATE_USER",
            SuspendUser => "SUSPEND_USER",
            ChangeRole => "CHANGE_ROLE",
            SeedSuperAdmin => "SEED_SUPER_ADMIN",
            Other(code) => code.as_str(),
        }
    }

    /// Never fails: unrecognised tags are kept verbatim
    pub fn from_code(code: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|action| action.code() == code)
            .unwrap_or_else(|| AuditAction::Other(code.to_string()))
    }

    pub fn credentials_email(sent: bool) -> Self {
        if sent {
            AuditAction::CredentialsEmailSent
        } else {
            AuditAction::CredentialsEmailFailed
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for AuditAction {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<AuditAction> for String {
    fn from(action: AuditAction) -> Self {
        match action {
            AuditAction::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

/// Entity names used in audit rows
pub mod audit_entity {
    pub const BUSINESS: &str = "BUSINESS";
    pub const USER: &str = "USER";
    pub const BUSINESS_USER: &str = "BUSINESS_USER";
}
