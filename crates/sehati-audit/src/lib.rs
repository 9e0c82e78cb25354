//! sehati-audit
//!
//! Application-level audit events for mutating API actions.

pub mod events;

pub use events::{AuditAction, AuditEvent};
