//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! [`crate::EmergencyContext::new`]. Nothing in this crate reads environment variables;
//! the binary reads them (see [`crate::constants::DOCTOR_ROSTER_ENV`] and
//! [`crate::constants::CURRENT_DOCTOR_ENV`]) and hands the raw values to the helpers
//! below.

use crate::doctors::{default_roster, parse_roster, Doctor};
use crate::error::{EmergencyError, EmergencyResult};
use crate::validation::validate_roster;
use std::path::PathBuf;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    roster: Vec<Doctor>,
    current_doctor_id: Option<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty roster or duplicate doctor ids, and
    /// [`EmergencyError::UnknownDoctor`] if `current_doctor_id` is not on the roster.
    pub fn new(roster: Vec<Doctor>, current_doctor_id: Option<String>) -> EmergencyResult<Self> {
        validate_roster(&roster)?;

        if let Some(id) = current_doctor_id.as_deref() {
            if !roster.iter().any(|d| d.id == id) {
                return Err(EmergencyError::UnknownDoctor(id.to_owned()));
            }
        }

        Ok(Self {
            roster,
            current_doctor_id,
        })
    }

    pub fn roster(&self) -> &[Doctor] {
        &self.roster
    }

    pub fn current_doctor_id(&self) -> Option<&str> {
        self.current_doctor_id.as_deref()
    }
}

impl Default for CoreConfig {
    /// The built-in roster with its first doctor on duty.
    fn default() -> Self {
        Self {
            roster: default_roster(),
            current_doctor_id: None,
        }
    }
}

/// Resolve the doctor roster.
///
/// With an override path the roster is read from that YAML file; otherwise the built-in
/// roster is used.
///
/// # Errors
///
/// Returns [`EmergencyError::RosterRead`] if the file cannot be read, and the errors of
/// [`parse_roster`] if its content is not a valid roster.
pub fn resolve_roster(override_path: Option<PathBuf>) -> EmergencyResult<Vec<Doctor>> {
    match override_path {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(EmergencyError::RosterRead)?;
            let roster = parse_roster(&text)?;
            tracing::info!(
                path = %path.display(),
                doctors = roster.len(),
                "loaded doctor roster"
            );
            Ok(roster)
        }
        None => Ok(default_roster()),
    }
}

/// Normalise an optional raw setting: trimmed, with empty values treated as unset.
pub fn setting_from_env_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_uses_builtin_roster() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.roster().len(), 3);
        assert!(cfg.current_doctor_id().is_none());
    }

    #[test]
    fn test_new_rejects_unknown_current_doctor() {
        let err = CoreConfig::new(default_roster(), Some("DR404".into())).unwrap_err();
        assert!(matches!(err, EmergencyError::UnknownDoctor(id) if id == "DR404"));
    }

    #[test]
    fn test_new_rejects_empty_roster() {
        assert!(matches!(
            CoreConfig::new(Vec::new(), None),
            Err(EmergencyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_roster_without_override() {
        let roster = resolve_roster(None).unwrap();
        assert_eq!(roster, default_roster());
    }

    #[test]
    fn test_resolve_roster_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "doctors:\n  - id: DR100\n    name: Dr. Ines Duarte\n    department: Trauma\n    specialty: [Orthopaedics]"
        )
        .unwrap();

        let roster = resolve_roster(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, "DR100");
        assert_eq!(roster[0].department, "Trauma");
    }

    #[test]
    fn test_resolve_roster_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_roster(Some(dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, EmergencyError::RosterRead(_)));
    }

    #[test]
    fn test_setting_from_env_value() {
        assert_eq!(setting_from_env_value(None), None);
        assert_eq!(setting_from_env_value(Some("   ".into())), None);
        assert_eq!(
            setting_from_env_value(Some(" DR002 ".into())),
            Some("DR002".to_string())
        );
    }
}
