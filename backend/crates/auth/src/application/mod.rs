//! Application Layer
//!
//! Use cases and application services.

pub mod abuse_guard;
pub mod access_guard;
pub mod audit_trail;
pub mod business_details;
pub mod change_password;
pub mod config;
pub mod invite_user;
pub mod login;
pub mod pagination;
pub mod profile;
pub mod register_business;
pub mod resend_credentials;
pub mod seed_super_admin;
pub mod services;
pub mod set_password;
pub mod set_password_link;
pub mod team;
pub mod user_directory;

// Re-exports
pub use access_guard::{Actor, IdentityResolver};
pub use audit_trail::AuditTrailUseCase;
pub use business_details::BusinessDetailsUseCase;
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::{AuthConfig, ResendPolicy};
pub use invite_user::{InviteUserInput, InviteUserOutput, InviteUserUseCase};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use pagination::{Page, PageRequest};
pub use profile::{ProfileUseCase, UpdateProfileInput};
pub use register_business::{
    BusinessRegistrationResult, RegisterBusinessInput, RegisterBusinessUseCase,
};
pub use resend_credentials::{ResendCredentialsOutput, ResendCredentialsUseCase};
pub use seed_super_admin::{SeedSuperAdminInput, SeedSuperAdminUseCase};
pub use services::{AccessClaims, AccessToken, AuthServices, TokenScope, TokenService};
pub use set_password::{SetPasswordInput, SetPasswordUseCase};
pub use team::TeamUseCase;
pub use user_directory::UserDirectoryUseCase;
