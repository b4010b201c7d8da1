//! End-to-end reconciliation runs: fetch, reconcile, report, write.

pub mod auditor;
pub mod report;

pub use auditor::{AuditOutcome, Auditor};
pub use report::render_report;
