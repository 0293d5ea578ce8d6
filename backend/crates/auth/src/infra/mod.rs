//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod log_gateway;
pub mod postgres;
pub mod smtp;

pub use log_gateway::LogNotificationGateway;
pub use postgres::PgCredentialStore;
pub use smtp::{SmtpConfig, SmtpNotificationGateway};
