//! Domain Layer
//!
//! Contains entities, value objects, repository traits, and the outbound
//! notification port.

pub mod entity;
pub mod notification;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    audit_log::AuditLog, business::Business, business_user::BusinessUser, user::User,
};
pub use notification::{NotificationError, NotificationGateway, SetPasswordEmail};
pub use repository::{AuditQuery, AuthStore};
