//! Doctor roster and the "doctor on duty" selection.
//!
//! The roster is fixed for the lifetime of an [`crate::EmergencyContext`]: doctors are
//! never added or removed at runtime. It comes either from [`default_roster`] or from a
//! YAML file parsed with [`parse_roster`].
//!
//! Roster YAML shape:
//!
//! ```yaml
//! doctors:
//!   - id: DR001
//!     name: Dr. James Wilson
//!     department: Emergency Medicine
//!     role: Attending Physician
//!     specialty: [Trauma, Critical Care]
//! ```

use crate::error::{EmergencyError, EmergencyResult};
use crate::validation::validate_roster;
use er_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A doctor who can be assigned to emergency cases.
///
/// Cases hold doctors by value, so an assigned doctor is a snapshot of the roster entry
/// at assignment time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub specialty: BTreeSet<String>,
}

impl Doctor {
    pub fn new(id: impl AsRef<str>, name: impl AsRef<str>) -> EmergencyResult<Self> {
        Ok(Self {
            id: NonEmptyText::new(id)?,
            name: NonEmptyText::new(name)?,
            department: String::new(),
            role: String::new(),
            specialty: BTreeSet::new(),
        })
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_specialty<I, S>(mut self, specialty: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specialty.extend(specialty.into_iter().map(Into::into));
        self
    }
}

/// The built-in roster used when no roster file is configured.
pub fn default_roster() -> Vec<Doctor> {
    fn doctor(
        id: &str,
        name: &str,
        department: &str,
        role: &str,
        specialty: &[&str],
    ) -> Doctor {
        Doctor {
            id: NonEmptyText::new(id).expect("static roster ids are non-blank"),
            name: NonEmptyText::new(name).expect("static roster names are non-blank"),
            department: department.to_owned(),
            role: role.to_owned(),
            specialty: specialty.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    vec![
        doctor(
            "DR001",
            "Dr. James Wilson",
            "Emergency Medicine",
            "Attending Physician",
            &["Trauma", "Critical Care"],
        ),
        doctor(
            "DR002",
            "Dr. Sarah Smith",
            "Cardiology",
            "Consultant",
            &["Cardiology", "Interventional Cardiology"],
        ),
        doctor(
            "DR003",
            "Dr. Michael Chen",
            "Neurology",
            "Senior Resident",
            &["Neurology", "Stroke"],
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RosterWire {
    doctors: Vec<DoctorWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DoctorWire {
    id: String,
    name: String,
    #[serde(default)]
    department: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    specialty: Vec<String>,
}

/// Parse a doctor roster from YAML text.
///
/// Uses `serde_path_to_error` so that a schema mismatch names the failing field
/// (for example `doctors[1].name`).
///
/// # Errors
///
/// Returns [`EmergencyError::RosterParse`] if the YAML does not match the roster schema
/// (including unknown keys), and the usual validation errors for blank names, blank or
/// duplicate ids, or an empty roster.
pub fn parse_roster(yaml_text: &str) -> EmergencyResult<Vec<Doctor>> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

    let wire = match serde_path_to_error::deserialize::<_, RosterWire>(deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() {
                "<root>"
            } else {
                path.as_str()
            };
            return Err(EmergencyError::RosterParse(format!("at {path}: {source}")));
        }
    };

    let doctors = wire
        .doctors
        .into_iter()
        .map(|d| {
            Ok(Doctor::new(d.id, d.name)?
                .with_department(d.department)
                .with_role(d.role)
                .with_specialty(d.specialty))
        })
        .collect::<EmergencyResult<Vec<_>>>()?;

    validate_roster(&doctors)?;
    Ok(doctors)
}

/// Read-only roster plus the currently selected doctor.
#[derive(Clone, Debug)]
pub struct DoctorRegistry {
    doctors: Vec<Doctor>,
    current: usize,
}

impl DoctorRegistry {
    /// Build a registry from a validated roster.
    ///
    /// `current_id` selects the initial doctor on duty; `None` selects the first roster
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty roster or duplicate ids, and
    /// [`EmergencyError::UnknownDoctor`] if `current_id` is not on the roster.
    pub fn new(doctors: Vec<Doctor>, current_id: Option<&str>) -> EmergencyResult<Self> {
        validate_roster(&doctors)?;

        let current = match current_id {
            Some(id) => doctors
                .iter()
                .position(|d| d.id == id)
                .ok_or_else(|| EmergencyError::UnknownDoctor(id.to_owned()))?,
            None => 0,
        };

        Ok(Self { doctors, current })
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn current(&self) -> &Doctor {
        &self.doctors[self.current]
    }

    pub fn find(&self, doctor_id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == doctor_id)
    }

    /// Select the doctor on duty.
    ///
    /// # Errors
    ///
    /// Returns [`EmergencyError::UnknownDoctor`] and keeps the current selection when
    /// `doctor_id` is not on the roster.
    pub fn switch_doctor(&mut self, doctor_id: &str) -> EmergencyResult<&Doctor> {
        let index = self
            .doctors
            .iter()
            .position(|d| d.id == doctor_id)
            .ok_or_else(|| EmergencyError::UnknownDoctor(doctor_id.to_owned()))?;
        self.current = index;
        Ok(&self.doctors[index])
    }
}
