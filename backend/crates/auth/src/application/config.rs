//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::TimeDelta;
use platform::password::HashingCost;
use platform::rate_limit::{CooldownConfig, RateLimitConfig};
use std::time::Duration;

/// Limits on credential resends, evaluated in field order
#[derive(Debug, Clone, Copy)]
pub struct ResendPolicy {
    /// Resends against one target user (3 per 24 hours)
    pub per_target: RateLimitConfig,
    /// Resends by one admin (10 per hour)
    pub per_admin: RateLimitConfig,
    /// Spacing for one admin/target pair (5 minutes)
    pub cooldown: CooldownConfig,
}

impl Default for ResendPolicy {
    fn default() -> Self {
        Self {
            per_target: RateLimitConfig::new(3, 24 * 3600),
            per_admin: RateLimitConfig::new(10, 3600),
            cooldown: CooldownConfig::new(5 * 60),
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS512 signing secret (at least 64 bytes)
    pub jwt_secret: Vec<u8>,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// System token lifetime (8 hours)
    pub system_token_ttl: Duration,
    /// Tenant token lifetime (24 hours)
    pub tenant_token_ttl: Duration,
    /// Set-password link lifetime (30 minutes)
    pub set_password_ttl: Duration,
    /// Base URL the set-password link points at
    pub frontend_base_url: String,
    pub hashing_cost: HashingCost,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub resend_policy: ResendPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: vec![0u8; 64],
            jwt_issuer: "invoicing-api".to_string(),
            jwt_audience: "invoicing-app".to_string(),
            system_token_ttl: Duration::from_secs(8 * 3600),
            tenant_token_ttl: Duration::from_secs(24 * 3600),
            set_password_ttl: Duration::from_secs(30 * 60),
            frontend_base_url: "https://app.example.com".to_string(),
            hashing_cost: HashingCost::default(),
            password_pepper: None,
            resend_policy: ResendPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(64),
            ..Default::default()
        }
    }

    /// Create config for development (local frontend)
    pub fn development() -> Self {
        Self {
            frontend_base_url: "http://localhost:3000".to_string(),
            ..Self::with_random_secret()
        }
    }

    pub fn system_token_ttl(&self) -> TimeDelta {
        to_delta(self.system_token_ttl)
    }

    pub fn tenant_token_ttl(&self) -> TimeDelta {
        to_delta(self.tenant_token_ttl)
    }

    pub fn set_password_ttl(&self) -> TimeDelta {
        to_delta(self.set_password_ttl)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
