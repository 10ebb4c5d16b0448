//! Read-only aggregate views for reporting and export.

use crate::cases::{CaseStatus, EmergencyCase};
use crate::constants::UNKNOWN_SEVERITY_LABEL;
use crate::doctors::Doctor;
use crate::error::{EmergencyError, EmergencyResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Case counts by status and by severity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub total: usize,
    pub active: usize,
    pub responded: usize,
    pub resolved: usize,
    /// Keyed by lowercase severity level; unrecognised text counts as `unknown`.
    pub by_severity: BTreeMap<String, usize>,
}

/// Assignment counts for one roster doctor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStats {
    pub doctor_id: String,
    pub name: String,
    pub department: String,
    pub assigned_cases: usize,
    pub resolved_cases: usize,
}

pub fn case_summary(cases: &[EmergencyCase]) -> CaseSummary {
    let mut summary = CaseSummary {
        total: cases.len(),
        ..CaseSummary::default()
    };

    for case in cases {
        match case.status {
            CaseStatus::Active => summary.active += 1,
            CaseStatus::Responded => summary.responded += 1,
            CaseStatus::Resolved => summary.resolved += 1,
        }

        let severity = case
            .severity()
            .map(|s| s.as_str())
            .unwrap_or(UNKNOWN_SEVERITY_LABEL);
        *summary.by_severity.entry(severity.to_owned()).or_default() += 1;
    }

    summary
}

/// One entry per roster doctor, in roster order, including doctors with no cases.
///
/// Cases are matched on the assigned doctor's id.
pub fn doctor_statistics(doctors: &[Doctor], cases: &[EmergencyCase]) -> Vec<DoctorStats> {
    doctors
        .iter()
        .map(|doctor| {
            let assigned: Vec<&EmergencyCase> = cases
                .iter()
                .filter(|c| {
                    c.assigned_doctor
                        .as_ref()
                        .is_some_and(|d| d.id == doctor.id)
                })
                .collect();

            DoctorStats {
                doctor_id: doctor.id.to_string(),
                name: doctor.name.to_string(),
                department: doctor.department.clone(),
                assigned_cases: assigned.len(),
                resolved_cases: assigned.iter().filter(|c| c.is_resolved()).count(),
            }
        })
        .collect()
}

/// Pretty-printed JSON array of the given cases.
pub fn export_cases_json(cases: &[EmergencyCase]) -> EmergencyResult<String> {
    serde_json::to_string_pretty(cases).map_err(EmergencyError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{CaseStore, NewCase};
    use crate::doctors::default_roster;

    fn populated_store() -> CaseStore {
        let roster = default_roster();
        let mut store = CaseStore::new();
        let a = store
            .create(Some(NewCase::new("A", "x").with_severity("Critical")))
            .unwrap()
            .case_id
            .clone();
        let b = store
            .create(Some(NewCase::new("B", "y").with_severity("critical")))
            .unwrap()
            .case_id
            .clone();
        store
            .create(Some(NewCase::new("C", "z").with_severity("urgent-ish")))
            .unwrap();

        store.assign_doctor(a.as_str(), Some(roster[1].clone())).unwrap();
        store.assign_doctor(b.as_str(), Some(roster[1].clone())).unwrap();
        store
            .update_status(b.as_str(), CaseStatus::Resolved, None)
            .unwrap();
        store
    }

    #[test]
    fn test_case_summary() {
        let store = populated_store();
        let summary = case_summary(store.cases());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 1);
        assert_eq!(summary.responded, 1);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.by_severity.get("critical"), Some(&2));
        assert_eq!(summary.by_severity.get(UNKNOWN_SEVERITY_LABEL), Some(&1));
    }

    #[test]
    fn test_doctor_statistics() {
        let store = populated_store();
        let stats = doctor_statistics(&default_roster(), store.cases());

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].assigned_cases, 0);
        assert_eq!(stats[1].doctor_id, "DR002");
        assert_eq!(stats[1].assigned_cases, 2);
        assert_eq!(stats[1].resolved_cases, 1);
    }

    #[test]
    fn test_export_cases_json() {
        let store = populated_store();
        let json = export_cases_json(store.cases()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array[0]["patientName"], "C");
    }
}
