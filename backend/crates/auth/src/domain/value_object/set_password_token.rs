//! Set-Password Token
//!
//! Single-use secret mailed to a user so they can choose a password.
//! Only its Argon2id hash is persisted; the raw value exists in memory just
//! long enough to build the link.

use kernel::error::app_error::{AppError, AppResult};
use platform::crypto::random_token_hex;
use platform::password::{HashedPassword, PasswordHasher};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Random bytes per token (hex encoded: 64 chars)
pub const TOKEN_BYTES: usize = 32;

/// Raw token value
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SetPasswordToken(String);

impl SetPasswordToken {
    pub fn generate() -> Self {
        Self(random_token_hex(TOKEN_BYTES))
    }

    /// Token as presented back by the user
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for a query string parameter
    pub fn url_escaped(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }

    pub fn hash(&self, hasher: &PasswordHasher) -> AppResult<TokenHash> {
        hasher
            .hash_secret(self.0.as_bytes())
            .map(TokenHash)
            .map_err(|e| AppError::internal("Token hashing failed").with_source(e))
    }

    pub fn matches(&self, hash: &TokenHash, hasher: &PasswordHasher) -> bool {
        !self.0.is_empty() && hasher.verify_secret(self.0.as_bytes(), &hash.0)
    }
}

impl fmt::Debug for SetPasswordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SetPasswordToken")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Stored hash of a [`SetPasswordToken`]
#[derive(Clone, PartialEq, Eq)]
pub struct TokenHash(HashedPassword);

impl TokenHash {
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|e| AppError::internal("Invalid token hash in database").with_source(e))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenHash([HASH])")
    }
}
