pub use kernel::id::{AuditLogId, BusinessId, MembershipId, UserId};
