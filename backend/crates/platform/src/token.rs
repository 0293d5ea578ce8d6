//! Bearer Token Codec
//!
//! Signed, time-bound JWTs (HS512). The codec owns the registered claims
//! (`iss`, `aud`, `iat`, `exp`, `jti`); callers supply their own payload,
//! which is flattened next to them.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// HS512 wants at least 64 bytes of key material.
pub const MIN_SECRET_LENGTH: usize = 64;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Signing secret must be at least {MIN_SECRET_LENGTH} bytes")]
    WeakSecret,

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<C> {
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
    jti: Uuid,
    #[serde(flatten)]
    claims: C,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Claims recovered from a valid token
#[derive(Debug, Clone)]
pub struct VerifiedToken<C> {
    pub claims: C,
    pub token_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// HS512 token codec bound to one issuer and audience
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenCodec {
    pub fn hs512(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(TokenError::WeakSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }

    /// Sign `claims`, valid for `ttl` from now.
    pub fn issue<C: Serialize>(&self, claims: C, ttl: TimeDelta) -> Result<IssuedToken, TokenError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + ttl;
        let token_id = Uuid::new_v4();

        let envelope = Envelope {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: token_id,
            claims,
        };

        let token = encode(&Header::new(Algorithm::HS512), &envelope, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            token_id,
            issued_at,
            expires_at,
        })
    }

    /// Check signature, issuer, audience and expiry, then return the payload.
    pub fn validate<C: DeserializeOwned>(&self, token: &str) -> Result<VerifiedToken<C>, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let data = decode::<Envelope<C>>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        let envelope = data.claims;

        Ok(VerifiedToken {
            claims: envelope.claims,
            token_id: envelope.jti,
            issued_at: from_timestamp(envelope.iat)?,
            expires_at: from_timestamp(envelope.exp)?,
        })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

fn from_timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenError::Invalid(format!("timestamp out of range: {secs}")))
}
