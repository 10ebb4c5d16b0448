//! Audit-trail notifications for case mutations.
//!
//! Every successful mutation through [`crate::EmergencyContext`] produces exactly one
//! [`Notification`] carrying a snapshot of the case as it was right after the change.
//! The log is newest-first and entries are never edited; they can only be cleared one at
//! a time.

use crate::cases::EmergencyCase;
use crate::doctors::Doctor;
use chrono::{DateTime, Utc};
use er_case_id::{NotificationId, NotificationIdGenerator};
use serde::Serialize;

/// What kind of mutation a notification records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewCase,
    StatusUpdate,
    DoctorAssigned,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::NewCase => "new_case",
            NotificationKind::StatusUpdate => "status_update",
            NotificationKind::DoctorAssigned => "doctor_assigned",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// The case right after the mutation.
    pub emergency: EmergencyCase,
}

/// Message for a newly reported case.
pub fn new_case_message(case: &EmergencyCase) -> String {
    format!("New emergency case reported: {}", case.condition)
}

/// Message for a status change.
pub fn status_update_message(case: &EmergencyCase) -> String {
    format!(
        "Case #{} status updated to {}",
        case.case_id.display_suffix(),
        case.status
    )
}

/// Message for a doctor assignment.
pub fn doctor_assigned_message(case: &EmergencyCase, doctor: &Doctor) -> String {
    format!(
        "{} assigned to case #{}",
        doctor.name,
        case.case_id.display_suffix()
    )
}

/// Newest-first notification log.
#[derive(Clone, Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
    ids: NotificationIdGenerator,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications, newest first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a notification and put it at the front of the log.
    pub fn emit(
        &mut self,
        kind: NotificationKind,
        message: String,
        snapshot: EmergencyCase,
    ) -> &Notification {
        let timestamp = Utc::now();
        let id = self.ids.next_id_at(timestamp);

        tracing::info!(
            notification_id = %id,
            kind = %kind,
            case_id = %snapshot.case_id,
            "{message}"
        );

        self.entries.insert(
            0,
            Notification {
                id,
                kind,
                message,
                timestamp,
                emergency: snapshot,
            },
        );
        &self.entries[0]
    }

    /// Remove one notification. Returns whether it was present.
    pub fn clear(&mut self, id: NotificationId) -> bool {
        match self.entries.iter().position(|n| n.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{CaseStatus, CaseStore, NewCase};
    use crate::doctors::default_roster;
    use er_case_id::CaseId;

    fn sample_case() -> EmergencyCase {
        let mut store = CaseStore::new();
        store
            .create(Some(
                NewCase::new("A", "Chest pain").with_case_id(CaseId::parse("ER-ABC123XYZ").unwrap()),
            ))
            .unwrap()
            .clone()
    }

    #[test]
    fn test_messages() {
        let mut case = sample_case();
        assert_eq!(new_case_message(&case), "New emergency case reported: Chest pain");

        case.status = CaseStatus::Responded;
        assert_eq!(
            status_update_message(&case),
            "Case #ABC123XYZ status updated to responded"
        );

        let doctor = default_roster().remove(1);
        assert_eq!(
            doctor_assigned_message(&case, &doctor),
            "Dr. Sarah Smith assigned to case #ABC123XYZ"
        );
    }

    #[test]
    fn test_emit_prepends_with_increasing_ids() {
        let mut log = NotificationLog::new();
        let case = sample_case();
        let first = log
            .emit(NotificationKind::NewCase, "one".into(), case.clone())
            .id;
        let second = log
            .emit(NotificationKind::StatusUpdate, "two".into(), case)
            .id;

        assert!(second > first);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].message, "two");
        assert_eq!(log.entries()[1].message, "one");
    }

    #[test]
    fn test_clear_removes_exactly_one() {
        let mut log = NotificationLog::new();
        let case = sample_case();
        let a = log.emit(NotificationKind::NewCase, "a".into(), case.clone()).id;
        let b = log.emit(NotificationKind::NewCase, "b".into(), case.clone()).id;
        log.emit(NotificationKind::NewCase, "c".into(), case);

        assert!(log.clear(b));
        assert_eq!(log.len(), 2);
        assert!(log.entries().iter().all(|n| n.id != b));
        assert!(log.entries().iter().any(|n| n.id == a));

        assert!(!log.clear(b));
        assert!(!log.clear(NotificationId::new(1)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let mut log = NotificationLog::new();
        let n = log.emit(NotificationKind::DoctorAssigned, "m".into(), sample_case());
        let json = serde_json::to_value(n).unwrap();
        assert_eq!(json["type"], "doctor_assigned");
        assert_eq!(json["emergency"]["caseId"], "ER-ABC123XYZ");
        assert!(json["id"].is_u64());
    }
}
