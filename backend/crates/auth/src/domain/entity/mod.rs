//! Entity Module

pub mod audit_log;
pub mod business;
pub mod business_user;
pub mod user;
