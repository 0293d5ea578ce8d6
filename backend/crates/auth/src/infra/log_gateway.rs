//! Development Notification Gateway
//!
//! Logs instead of sending. Used when SMTP is not configured; the link is
//! only emitted at debug level.

use crate::domain::notification::{NotificationError, NotificationGateway, SetPasswordEmail};

#[derive(Debug, Clone, Default)]
pub struct LogNotificationGateway;

impl NotificationGateway for LogNotificationGateway {
    async fn send_set_password_email(
        &self,
        email: &SetPasswordEmail,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            to = %email.to,
            kind = ?email.kind,
            "SMTP not configured, set-password email not sent"
        );
        tracing::debug!(to = %email.to, link = %email.link, "Set-password link");
        Ok(())
    }
}
