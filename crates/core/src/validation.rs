//! Input validation utilities.
//!
//! Checks applied to caller input before any state is touched, so that a rejected call
//! leaves the store and the notification log exactly as they were.

use crate::doctors::Doctor;
use crate::error::{EmergencyError, EmergencyResult};
use std::collections::HashSet;

/// Validates a doctor roster: at least one doctor, and no two doctors share an id.
///
/// Blank ids and names are already ruled out by `NonEmptyText`.
///
/// # Errors
///
/// Returns `EmergencyError::InvalidInput` naming the first duplicated id, or stating
/// that the roster is empty.
pub fn validate_roster(doctors: &[Doctor]) -> EmergencyResult<()> {
    if doctors.is_empty() {
        return Err(EmergencyError::InvalidInput(
            "doctor roster cannot be empty".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(doctors.len());
    for doctor in doctors {
        if !seen.insert(doctor.id.as_str()) {
            return Err(EmergencyError::InvalidInput(format!(
                "duplicate doctor id in roster: {}",
                doctor.id
            )));
        }
    }

    Ok(())
}

/// Returns the case id argument, or `MissingCaseId` when it is blank.
pub fn require_case_id(case_id: &str) -> EmergencyResult<&str> {
    if case_id.trim().is_empty() {
        return Err(EmergencyError::MissingCaseId);
    }
    Ok(case_id)
}
