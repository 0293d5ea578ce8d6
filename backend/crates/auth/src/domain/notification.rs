//! Notification Gateway
//!
//! Outbound email port. Delivery failures are reported to the caller, which
//! records them instead of failing the surrounding operation.

use thiserror::Error;

use crate::domain::value_object::email::Email;

/// Why the set-password email is being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPasswordEmailKind {
    /// Owner of a newly registered business
    Welcome,
    /// Member invited by an owner or admin
    Invitation,
    /// Credentials re-issued by an admin
    Reset,
}

impl SetPasswordEmailKind {
    pub fn subject(&self, business_name: &str) -> String {
        match self {
            SetPasswordEmailKind::Welcome => format!("Welcome to {business_name}: set your password"),
            SetPasswordEmailKind::Invitation => {
                format!("You have been invited to {business_name}")
            }
            SetPasswordEmailKind::Reset => format!("Reset your {business_name} password"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SetPasswordEmail {
    pub to: Email,
    pub full_name: String,
    pub business_name: String,
    /// Contains the raw token; never log it
    pub link: String,
    pub kind: SetPasswordEmailKind,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[trait_variant::make(NotificationGateway: Send)]
pub trait LocalNotificationGateway {
    async fn send_set_password_email(&self, email: &SetPasswordEmail)
    -> Result<(), NotificationError>;
}
