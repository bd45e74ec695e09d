//! Audit records for access-binding decisions.
//!
//! - `AuditEvent`: one decision, with only identifiers and the outcome
//! - `AuditTrail`: in-memory, thread-safe recorder of events
//!
//! Events never carry tokens or upstream payloads.

mod event;
mod trail;

pub use event::{AuditEvent, AuditOutcome, AUDIT_TARGET};
pub use trail::AuditTrail;
