//! SMTP Notification Gateway (lettre)
//!
//! Sends the set-password email as a plain-text/HTML alternative rendered
//! from askama templates. The
//! blocking transport runs on tokio's blocking pool.

use askama::Template;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

use crate::domain::notification::{
    NotificationGateway, NotificationError, SetPasswordEmail, SetPasswordEmailKind,
};

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

#[derive(Clone)]
pub struct SmtpNotificationGateway {
    mailer: SmtpTransport,
    from: Mailbox,
}

impl SmtpNotificationGateway {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotificationError> {
        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Address(e.to_string()))?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| NotificationError::Delivery(e.to_string()))?
            .credentials(creds)
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, port = config.port, "SMTP gateway initialized");

        Ok(Self { mailer, from })
    }
}

impl NotificationGateway for SmtpNotificationGateway {
    async fn send_set_password_email(
        &self,
        email: &SetPasswordEmail,
    ) -> Result<(), NotificationError> {
        let to = email
            .to
            .as_str()
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Address(e.to_string()))?;

        let (plain, html) = render_bodies(email)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.kind.subject(&email.business_name))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .map_err(|e| NotificationError::Message(e.to_string()))?;

        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| NotificationError::Delivery(e.to_string()))?
            .map_err(|e| NotificationError::Delivery(e.to_string()))?;

        Ok(())
    }
}

/// Minutes a set-password link stays valid, as printed in the email
const LINK_VALID_MINUTES: i64 = 30;

#[derive(Template)]
#[template(path = "set_password_email.html")]
struct SetPasswordHtml<'a> {
    full_name: &'a str,
    intro: &'a str,
    link: &'a str,
    valid_minutes: i64,
}

#[derive(Template)]
#[template(path = "set_password_email.txt")]
struct SetPasswordText<'a> {
    full_name: &'a str,
    intro: &'a str,
    link: &'a str,
    valid_minutes: i64,
}

fn intro_line(email: &SetPasswordEmail) -> String {
    match email.kind {
        SetPasswordEmailKind::Welcome => {
            format!("Your business {} has been registered.", email.business_name)
        }
        SetPasswordEmailKind::Invitation => {
            format!("You have been invited to join {}.", email.business_name)
        }
        SetPasswordEmailKind::Reset => format!(
            "An administrator of {} has issued you new credentials.",
            email.business_name
        ),
    }
}

fn render_bodies(email: &SetPasswordEmail) -> Result<(String, String), NotificationError> {
    let intro = intro_line(email);

    let plain = SetPasswordText {
        full_name: &email.full_name,
        intro: &intro,
        link: &email.link,
        valid_minutes: LINK_VALID_MINUTES,
    }
    .render()
    .map_err(|e| NotificationError::Message(e.to_string()))?;

    let html = SetPasswordHtml {
        full_name: &email.full_name,
        intro: &intro,
        link: &email.link,
        valid_minutes: LINK_VALID_MINUTES,
    }
    .render()
    .map_err(|e| NotificationError::Message(e.to_string()))?;

    Ok((plain, html))
}
