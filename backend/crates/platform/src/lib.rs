//! Platform Crate - Technical Infrastructure
//!
//! Domain-free building blocks shared by the backend:
//! - [`crypto`]: CSPRNG bytes and hex tokens
//! - [`password`]: Argon2id hashing with a tunable cost and NIST SP 800-63B policy
//! - [`token`]: signed, time-bound bearer tokens (JWT, HS512)
//! - [`rate_limit`]: sliding-window and cooldown policy evaluation

pub mod crypto;
pub mod password;
pub mod rate_limit;
pub mod token;
