//! Shared Auth Services
//!
//! Hasher and token service built once from [`AuthConfig`] and shared by
//! every use case.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::PasswordHasher;
use platform::token::{TokenCodec, VerifiedToken};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{business_user::BusinessUser, user::User};
use crate::domain::value_object::{system_role::SystemRole, tenant_role::TenantRole};
use crate::error::AuthResult;

/// Token audience scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenScope {
    System,
    Tenant,
}

/// Payload carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub system_role: SystemRole,
    pub scope: TokenScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_role: Option<TenantRole>,
}

/// Signed access token handed to the client
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub scope: TokenScope,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenService {
    codec: TokenCodec,
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> AuthResult<Self> {
        let codec = TokenCodec::hs512(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
        )?;
        Ok(Self { codec, config })
    }

    /// Platform-wide token (no tenant context)
    pub fn issue_system(&self, user: &User) -> AuthResult<AccessToken> {
        let claims = AccessClaims {
            sub: user.user_id.into_uuid(),
            name: user.full_name.clone(),
            email: user.email.to_string(),
            system_role: user.system_role,
            scope: TokenScope::System,
            business_id: None,
            business_role: None,
        };
        self.issue(claims, self.config.system_token_ttl())
    }

    /// Token scoped to one business membership
    pub fn issue_tenant(&self, user: &User, membership: &BusinessUser) -> AuthResult<AccessToken> {
        let claims = AccessClaims {
            sub: user.user_id.into_uuid(),
            name: user.full_name.clone(),
            email: user.email.to_string(),
            system_role: user.system_role,
            scope: TokenScope::Tenant,
            business_id: Some(membership.business_id.into_uuid()),
            business_role: Some(membership.role),
        };
        self.issue(claims, self.config.tenant_token_ttl())
    }

    pub fn validate(&self, token: &str) -> AuthResult<VerifiedToken<AccessClaims>> {
        Ok(self.codec.validate(token)?)
    }

    fn issue(&self, claims: AccessClaims, ttl: chrono::TimeDelta) -> AuthResult<AccessToken> {
        let scope = claims.scope;
        let issued = self.codec.issue(claims, ttl)?;
        Ok(AccessToken {
            token: issued.token,
            scope,
            expires_at: issued.expires_at,
        })
    }
}

/// Everything a use case needs besides storage
#[derive(Clone)]
pub struct AuthServices {
    pub config: Arc<AuthConfig>,
    pub hasher: PasswordHasher,
    pub tokens: TokenService,
}

impl AuthServices {
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        let hasher = PasswordHasher::new(config.hashing_cost, config.password_pepper.clone())?;
        let config = Arc::new(config);
        let tokens = TokenService::new(config.clone())?;
        Ok(Self {
            config,
            hasher,
            tokens,
        })
    }
}
