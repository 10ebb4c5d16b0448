//! Emergency cases and the in-memory case store.
//!
//! The store keeps cases most-recent-first and is the only place case records are
//! mutated. It does not emit notifications itself; [`crate::EmergencyContext`] pairs every
//! successful store mutation with exactly one notification.
//!
//! ## Status lifecycle
//!
//! ```text
//! active ──► responded ──► resolved
//!    └───────────────────────▲
//! ```
//!
//! Moving backwards is rejected, and `resolved` is terminal: neither a status update nor
//! a doctor assignment can take a case out of it. Re-applying the current status is
//! allowed, which is how extra staff get attached to a case.

use crate::constants::DEFAULT_PRIORITY;
use crate::doctors::Doctor;
use crate::error::{EmergencyError, EmergencyResult};
use crate::validation::require_case_id;
use chrono::{DateTime, Utc};
use er_case_id::CaseId;
use er_types::{StaffRecord, VitalSigns};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored status of a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Reported, nobody has responded yet.
    Active,
    /// Staff or a doctor are attending.
    Responded,
    /// Closed. Terminal.
    Resolved,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Active => "active",
            CaseStatus::Responded => "responded",
            CaseStatus::Resolved => "resolved",
        }
    }

    fn rank(self) -> u8 {
        match self {
            CaseStatus::Active => 0,
            CaseStatus::Responded => 1,
            CaseStatus::Resolved => 2,
        }
    }

    /// Whether a case in this status may move to `next`.
    pub fn can_transition_to(self, next: CaseStatus) -> bool {
        match self {
            CaseStatus::Resolved => next == CaseStatus::Resolved,
            _ => next.rank() >= self.rank(),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = EmergencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(CaseStatus::Active),
            "responded" => Ok(CaseStatus::Responded),
            "resolved" => Ok(CaseStatus::Resolved),
            // Shown by the dashboard for unassigned cases, never stored.
            "pending" => Err(EmergencyError::InvalidInput(
                "'pending' is a display label, not a case status".into(),
            )),
            other => Err(EmergencyError::InvalidInput(format!(
                "unknown case status '{other}' (expected active, responded or resolved)"
            ))),
        }
    }
}

/// Qualitative urgency of a case. Independent of the numeric priority used for ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl SeverityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLevel::Critical => "critical",
            SeverityLevel::High => "high",
            SeverityLevel::Medium => "medium",
            SeverityLevel::Low => "low",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = EmergencyError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(SeverityLevel::Critical),
            "high" => Ok(SeverityLevel::High),
            "medium" => Ok(SeverityLevel::Medium),
            "low" => Ok(SeverityLevel::Low),
            other => Err(EmergencyError::InvalidInput(format!(
                "unknown severity level '{other}'"
            ))),
        }
    }
}

/// A tracked emergency case.
///
/// Serialised with camelCase keys; unset optional fields serialise as `null` so that UI
/// collaborators always see the full record shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyCase {
    pub case_id: CaseId,
    pub patient_name: String,
    pub condition: String,
    /// Stored exactly as reported; see [`EmergencyCase::severity`].
    pub severity_level: String,
    pub status: CaseStatus,
    pub timestamp: DateTime<Utc>,
    pub response_time: Option<DateTime<Utc>>,
    pub assigned_doctor: Option<Doctor>,
    pub assigned_staff: Vec<StaffRecord>,
    pub vital_signs: Option<VitalSigns>,
    pub priority: Option<u32>,
}

impl EmergencyCase {
    /// The severity level read case-insensitively, or `None` if the reported text is not
    /// one of the known levels.
    pub fn severity(&self) -> Option<SeverityLevel> {
        self.severity_level.parse().ok()
    }

    /// Priority used for ordering: the reported priority, or [`DEFAULT_PRIORITY`].
    pub fn effective_priority(&self) -> u32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == CaseStatus::Resolved
    }
}

/// Data for a new case. Every field is optional.
///
/// Defaults applied by [`CaseStore::create`]:
/// - `case_id`: generated `ER-XXXXXXXXX`
/// - `patient_name`, `condition`, `severity_level`: empty text
/// - `status`: [`CaseStatus::Active`]
/// - `timestamp`: time of creation
/// - `vital_signs`, `priority`: absent
///
/// Deserialises from the camelCase shape the dashboard forms submit.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCase {
    pub case_id: Option<CaseId>,
    pub patient_name: Option<String>,
    pub condition: Option<String>,
    pub severity_level: Option<String>,
    pub status: Option<CaseStatus>,
    pub timestamp: Option<DateTime<Utc>>,
    pub vital_signs: Option<VitalSigns>,
    pub priority: Option<u32>,
}

impl NewCase {
    pub fn new(patient_name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            patient_name: Some(patient_name.into()),
            condition: Some(condition.into()),
            ..Self::default()
        }
    }

    pub fn with_case_id(mut self, case_id: CaseId) -> Self {
        self.case_id = Some(case_id);
        self
    }

    pub fn with_severity(mut self, severity_level: impl Into<String>) -> Self {
        self.severity_level = Some(severity_level.into());
        self
    }

    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_vital_signs(mut self, vital_signs: VitalSigns) -> Self {
        self.vital_signs = Some(vital_signs);
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// In-memory collection of emergency cases, most recent first.
#[derive(Clone, Debug, Default)]
pub struct CaseStore {
    cases: Vec<EmergencyCase>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cases, most recently created first.
    pub fn cases(&self) -> &[EmergencyCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Linear scan by case id.
    pub fn get(&self, case_id: &str) -> Option<&EmergencyCase> {
        self.cases.iter().find(|c| c.case_id == case_id)
    }

    fn get_mut(&mut self, case_id: &str) -> EmergencyResult<&mut EmergencyCase> {
        self.cases
            .iter_mut()
            .find(|c| c.case_id == case_id)
            .ok_or_else(|| EmergencyError::CaseNotFound(case_id.to_owned()))
    }

    fn unused_case_id(&self) -> CaseId {
        loop {
            let candidate = CaseId::generate();
            if self.get(candidate.as_str()).is_none() {
                return candidate;
            }
        }
    }

    /// Create a case and put it at the front of the store.
    ///
    /// # Errors
    ///
    /// - [`EmergencyError::MissingCaseData`] if `data` is `None`.
    /// - [`EmergencyError::DuplicateCaseId`] if a supplied id is already in the store.
    pub fn create(&mut self, data: Option<NewCase>) -> EmergencyResult<&EmergencyCase> {
        let data = data.ok_or(EmergencyError::MissingCaseData)?;

        let case_id = match data.case_id {
            Some(id) if self.get(id.as_str()).is_some() => {
                return Err(EmergencyError::DuplicateCaseId(id.to_string()));
            }
            Some(id) => id,
            None => self.unused_case_id(),
        };

        let now = Utc::now();
        let status = data.status.unwrap_or(CaseStatus::Active);
        let response_time = (status == CaseStatus::Responded).then_some(now);

        let case = EmergencyCase {
            case_id,
            patient_name: data.patient_name.unwrap_or_default(),
            condition: data.condition.unwrap_or_default(),
            severity_level: data.severity_level.unwrap_or_default(),
            status,
            timestamp: data.timestamp.unwrap_or(now),
            response_time,
            assigned_doctor: None,
            assigned_staff: Vec::new(),
            vital_signs: data.vital_signs,
            priority: data.priority,
        };

        self.cases.insert(0, case);
        Ok(&self.cases[0])
    }

    /// Set the status of a case, optionally attaching a member of staff.
    ///
    /// The first move to `responded` stamps `response_time` with the current time.
    ///
    /// # Errors
    ///
    /// - [`EmergencyError::MissingCaseId`] for a blank id.
    /// - [`EmergencyError::CaseNotFound`] if no case has this id.
    /// - [`EmergencyError::CaseResolved`] if the case is resolved and `status` is not.
    /// - [`EmergencyError::InvalidTransition`] for a backward move.
    pub fn update_status(
        &mut self,
        case_id: &str,
        status: CaseStatus,
        staff: Option<StaffRecord>,
    ) -> EmergencyResult<&EmergencyCase> {
        let case_id = require_case_id(case_id)?;
        let case = self.get_mut(case_id)?;

        if case.is_resolved() && status != CaseStatus::Resolved {
            return Err(EmergencyError::CaseResolved(case_id.to_owned()));
        }
        if !case.status.can_transition_to(status) {
            return Err(EmergencyError::InvalidTransition {
                from: case.status,
                to: status,
            });
        }

        case.status = status;
        if let Some(staff) = staff {
            case.assigned_staff.push(staff);
        }
        if status == CaseStatus::Responded {
            case.response_time.get_or_insert_with(Utc::now);
        }

        Ok(&*case)
    }

    /// Assign a doctor to a case. Always leaves the case `responded`.
    ///
    /// `response_time` is stamped if the case had not been responded to yet.
    ///
    /// # Errors
    ///
    /// - [`EmergencyError::MissingCaseId`] for a blank id.
    /// - [`EmergencyError::MissingDoctor`] if `doctor` is `None`.
    /// - [`EmergencyError::CaseNotFound`] if no case has this id.
    /// - [`EmergencyError::CaseResolved`] if the case is resolved.
    pub fn assign_doctor(
        &mut self,
        case_id: &str,
        doctor: Option<Doctor>,
    ) -> EmergencyResult<&EmergencyCase> {
        let case_id = require_case_id(case_id)?;
        let doctor = doctor.ok_or(EmergencyError::MissingDoctor)?;
        let case = self.get_mut(case_id)?;

        if case.is_resolved() {
            return Err(EmergencyError::CaseResolved(case_id.to_owned()));
        }

        case.assigned_doctor = Some(doctor);
        case.status = CaseStatus::Responded;
        case.response_time.get_or_insert_with(Utc::now);

        Ok(&*case)
    }
}
