//! Constants used throughout the emergency core crate.

/// Priority assumed for cases that were reported without one. Lower is more urgent.
pub const DEFAULT_PRIORITY: u32 = 999;

/// Environment variable naming a YAML doctor roster file.
///
/// Read by the binary at startup only; the core never touches the environment.
pub const DOCTOR_ROSTER_ENV: &str = "ER_DOCTOR_ROSTER";

/// Environment variable selecting the doctor on duty at startup.
pub const CURRENT_DOCTOR_ENV: &str = "ER_CURRENT_DOCTOR";

/// Severity bucket used by reports for severity text that is not recognised.
pub const UNKNOWN_SEVERITY_LABEL: &str = "unknown";
