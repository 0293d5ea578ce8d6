//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - [`error`]: the unified [`AppError`](error::app_error::AppError) and its
//!   HTTP-facing [`ErrorKind`](error::kind::ErrorKind)
//! - [`id`]: typed UUID identifiers for tenancy entities
//!
//! Only things whose meaning is stable across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
