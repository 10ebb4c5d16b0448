//! Identifier utilities for emergency cases and notifications.
//!
//! Two kinds of identifier are handed out by the emergency core:
//!
//! - **Case ids** ([`CaseId`]): `ER-` followed by nine uppercase alphanumeric characters,
//!   for example `ER-7KQ2M9XAB`. Callers may also supply their own id when a case is
//!   imported from elsewhere; those are stored as given as long as they are not blank.
//! - **Notification ids** ([`NotificationId`]): milliseconds since the Unix epoch, bumped
//!   so that every id handed out by one [`NotificationIdGenerator`] is strictly greater
//!   than the previous one.
//!
//! ## Display suffix
//! Operator-facing messages refer to a case as `#<suffix>`, where the suffix is the
//! second `-`-separated segment of the id (`ER-7KQ2M9XAB` -> `7KQ2M9XAB`). This is only
//! a display convention and never used for lookup.

mod service;

pub use service::{CaseId, NotificationId, NotificationIdGenerator};

/// Prefix of every generated case id.
pub const CASE_ID_PREFIX: &str = "ER";

/// Number of random characters after the prefix.
pub const CASE_ID_RANDOM_LEN: usize = 9;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CaseIdError {
    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type CaseIdResult<T> = Result<T, CaseIdError>;
