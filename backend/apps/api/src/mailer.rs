//! Outbound mail selection
//!
//! SMTP when configured, otherwise the logging gateway.

use auth::domain::{NotificationError, NotificationGateway, SetPasswordEmail};
use auth::{LogNotificationGateway, SmtpConfig, SmtpNotificationGateway};

pub enum Mailer {
    Smtp(SmtpNotificationGateway),
    Log(LogNotificationGateway),
}

impl Mailer {
    pub fn from_config(config: Option<&SmtpConfig>) -> Result<Self, NotificationError> {
        match config {
            Some(config) => {
                tracing::info!(host = %config.host, port = config.port, "SMTP gateway enabled");
                Ok(Mailer::Smtp(SmtpNotificationGateway::new(config)?))
            }
            None => {
                tracing::warn!("SMTP_HOST not set, set-password emails will only be logged");
                Ok(Mailer::Log(LogNotificationGateway))
            }
        }
    }
}

impl NotificationGateway for Mailer {
    async fn send_set_password_email(
        &self,
        email: &SetPasswordEmail,
    ) -> Result<(), NotificationError> {
        match self {
            Mailer::Smtp(gateway) => gateway.send_set_password_email(email).await,
            Mailer::Log(gateway) => gateway.send_set_password_email(email).await,
        }
    }
}
