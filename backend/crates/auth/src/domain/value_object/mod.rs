//! Value Object Module

pub mod audit_action;
pub mod email;
pub mod identity;
pub mod ids;
pub mod set_password_token;
pub mod subscription_plan;
pub mod system_role;
pub mod tenant_role;
pub mod user_password;
