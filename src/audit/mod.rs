//! Audit logging system for fintrack
//!
//! The local backend records every create, update and delete it performs in
//! an append-only JSONL file, with the entity state before and after.
//!
//! ```rust,ignore
//! use fintrack::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(user.id, EntityType::Goal, goal.id.to_string(), Some(goal.title.clone()), &goal))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
