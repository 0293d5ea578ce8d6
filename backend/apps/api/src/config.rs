//! Environment Configuration
//!
//! Everything the server reads from the environment, resolved once at
//! startup into explicit structs.

use anyhow::{Context, bail};
use auth::{AuthConfig, SmtpConfig};
use base64::Engine;
use base64::engine::general_purpose;
use std::env;

pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub smtp: Option<SmtpConfig>,
    pub super_admin: Option<SuperAdminSeed>,
}

pub struct SuperAdminSeed {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let port = match env::var("PORT") {
            Ok(port) => port.parse().context("PORT must be a valid port number")?,
            Err(_) => 31113,
        };

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            port,
            frontend_origins,
            auth: auth_config()?,
            smtp: smtp_config()?,
            super_admin: super_admin_seed(),
        })
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("JWT_SECRET") {
        Ok(secret_b64) => AuthConfig {
            jwt_secret: general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("JWT_SECRET must be base64")?,
            ..AuthConfig::default()
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random development secret");
            AuthConfig::development()
        }
        Err(_) => bail!("JWT_SECRET must be set in production"),
    };

    if let Ok(issuer) = env::var("JWT_ISSUER") {
        config.jwt_issuer = issuer;
    }
    if let Ok(audience) = env::var("JWT_AUDIENCE") {
        config.jwt_audience = audience;
    }
    if let Ok(url) = env::var("FRONTEND_BASE_URL") {
        config.frontend_base_url = url;
    }
    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(
            general_purpose::STANDARD
                .decode(pepper.trim())
                .context("PASSWORD_PEPPER must be base64")?,
        );
    }

    Ok(config)
}

/// `None` when `SMTP_HOST` is unset; emails are then only logged
fn smtp_config() -> anyhow::Result<Option<SmtpConfig>> {
    let Ok(host) = env::var("SMTP_HOST") else {
        return Ok(None);
    };

    let port = match env::var("SMTP_PORT") {
        Ok(port) => port.parse().context("SMTP_PORT must be a valid port number")?,
        Err(_) => 587,
    };

    Ok(Some(SmtpConfig {
        host,
        port,
        username: env::var("SMTP_USERNAME").context("SMTP_USERNAME must be set")?,
        password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
        from_address: env::var("SMTP_FROM_ADDRESS").context("SMTP_FROM_ADDRESS must be set")?,
        from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Invoicing".to_string()),
    }))
}

fn super_admin_seed() -> Option<SuperAdminSeed> {
    let email = env::var("SUPER_ADMIN_EMAIL").ok()?;
    let password = env::var("SUPER_ADMIN_PASSWORD").ok()?;
    Some(SuperAdminSeed {
        email,
        password,
        full_name: env::var("SUPER_ADMIN_NAME").unwrap_or_else(|_| "Super Admin".to_string()),
    })
}
