//! Auth and Tenancy Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and gateway traits
//! - `application/` - Use cases, guards, token and hashing services
//! - `infra/` - Postgres store, SMTP and log notification gateways
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Features
//! - Super-admin registration of businesses with an owner account
//! - Email + password login issuing system or tenant scoped bearer tokens
//! - Owner/admin invitations and credential resends with set-password links
//! - Team management, own-profile edits and a per-business audit trail
//! - Platform-admin user directory and system-wide audit trail
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optionally peppered
//! - Set-password tokens are single use, stored only as hashes, expire after 30 minutes
//! - Tokens issued before the last password change are rejected
//! - Credential resends are rate limited from the audit log

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, ResendPolicy};
pub use application::services::AuthServices;
pub use application::seed_super_admin::{SeedSuperAdminInput, SeedSuperAdminUseCase};
pub use error::{AuthError, AuthResult};
pub use infra::{LogNotificationGateway, PgCredentialStore, SmtpConfig, SmtpNotificationGateway};
pub use presentation::{AuthAppState, admin_router, auth_router, business_router, user_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
