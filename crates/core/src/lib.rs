//! # ER Core
//!
//! Core business logic for emergency-case tracking.
//!
//! This crate holds the in-memory state behind the hospital dashboard's emergency views:
//! - Case creation, status transitions and doctor assignment ([`cases`])
//! - The priority-ordered view of open cases ([`scheduler`])
//! - An audit trail of notifications, one per successful mutation ([`notifications`])
//! - The doctor roster and the doctor on duty ([`doctors`])
//! - Read-only aggregates for reporting and export ([`reports`])
//!
//! Everything is reached through [`EmergencyContext`], constructed from a [`CoreConfig`].
//!
//! **No UI or transport concerns**: rendering, routing and export formats other than the
//! JSON case dump belong to the callers. State lives for the lifetime of the context only.

pub mod cases;
pub mod config;
pub mod constants;
pub mod context;
pub mod doctors;
pub mod error;
pub mod notifications;
pub mod reports;
pub mod scheduler;
pub mod validation;

pub use cases::{CaseStatus, CaseStore, EmergencyCase, NewCase, SeverityLevel};
pub use config::CoreConfig;
pub use context::EmergencyContext;
pub use doctors::{Doctor, DoctorRegistry};
pub use error::{EmergencyError, EmergencyResult};
pub use notifications::{Notification, NotificationKind, NotificationLog};
pub use reports::{CaseSummary, DoctorStats};

// Re-export identifier and value types so callers need only this crate.
pub use er_case_id::{CaseId, NotificationId};
pub use er_types::{NonEmptyText, StaffRecord, VitalSigns};
