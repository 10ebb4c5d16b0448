//! The emergency context: the single object UI collaborators talk to.
//!
//! [`EmergencyContext`] owns the case store, the notification log and the doctor
//! registry. It is created once per session from a [`CoreConfig`] and passed around by
//! reference; there is no global instance.
//!
//! Each mutating call either applies one state change and emits exactly one
//! notification, or returns an error and changes nothing. Rejected calls are also logged
//! at `warn` level for the operator.

use crate::cases::{CaseStatus, CaseStore, EmergencyCase, NewCase};
use crate::config::CoreConfig;
use crate::doctors::{Doctor, DoctorRegistry};
use crate::error::{EmergencyError, EmergencyResult};
use crate::notifications::{
    doctor_assigned_message, new_case_message, status_update_message, Notification,
    NotificationKind, NotificationLog,
};
use crate::reports::{self, CaseSummary, DoctorStats};
use crate::scheduler;
use crate::validation::require_case_id;
use er_case_id::NotificationId;
use er_types::StaffRecord;

fn reported<T>(operation: &'static str, result: EmergencyResult<T>) -> EmergencyResult<T> {
    if let Err(err) = &result {
        tracing::warn!(operation, error = %err, "emergency operation rejected");
    }
    result
}

#[derive(Clone, Debug)]
pub struct EmergencyContext {
    cases: CaseStore,
    notifications: NotificationLog,
    doctors: DoctorRegistry,
}

impl EmergencyContext {
    /// Creates an empty context with the configured roster and doctor on duty.
    pub fn new(cfg: &CoreConfig) -> EmergencyResult<Self> {
        let doctors = DoctorRegistry::new(cfg.roster().to_vec(), cfg.current_doctor_id())?;
        Ok(Self {
            cases: CaseStore::new(),
            notifications: NotificationLog::new(),
            doctors,
        })
    }

    /// All cases, most recently created first.
    pub fn cases(&self) -> &[EmergencyCase] {
        self.cases.cases()
    }

    /// Unresolved cases, most urgent first. Recomputed on every call.
    pub fn active_cases(&self) -> Vec<&EmergencyCase> {
        let active = scheduler::active_emergencies(self.cases.cases());
        tracing::debug!(active = active.len(), total = self.cases.len(), "computed active cases");
        active
    }

    /// Notifications, newest first.
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.entries()
    }

    pub fn current_doctor(&self) -> &Doctor {
        self.doctors.current()
    }

    pub fn doctors(&self) -> &[Doctor] {
        self.doctors.doctors()
    }

    pub fn get_emergency_by_id(&self, case_id: &str) -> Option<&EmergencyCase> {
        self.cases.get(case_id)
    }

    /// Report a new case and emit a `new_case` notification.
    ///
    /// # Errors
    ///
    /// See [`CaseStore::create`].
    pub fn create_emergency(&mut self, data: Option<NewCase>) -> EmergencyResult<EmergencyCase> {
        let case = reported("create_emergency", self.cases.create(data).cloned())?;

        let message = new_case_message(&case);
        self.notifications
            .emit(NotificationKind::NewCase, message, case.clone());
        Ok(case)
    }

    /// Change a case's status and emit a `status_update` notification.
    ///
    /// # Errors
    ///
    /// See [`CaseStore::update_status`].
    pub fn update_status(
        &mut self,
        case_id: &str,
        status: CaseStatus,
        staff: Option<StaffRecord>,
    ) -> EmergencyResult<EmergencyCase> {
        let case = reported(
            "update_status",
            self.cases.update_status(case_id, status, staff).cloned(),
        )?;

        let message = status_update_message(&case);
        self.notifications
            .emit(NotificationKind::StatusUpdate, message, case.clone());
        Ok(case)
    }

    /// Assign a doctor (by value) and emit a `doctor_assigned` notification.
    ///
    /// # Errors
    ///
    /// See [`CaseStore::assign_doctor`].
    pub fn assign_doctor(
        &mut self,
        case_id: &str,
        doctor: Option<Doctor>,
    ) -> EmergencyResult<EmergencyCase> {
        let doctor = reported(
            "assign_doctor",
            require_case_id(case_id).and_then(|_| doctor.ok_or(EmergencyError::MissingDoctor)),
        )?;
        let case = reported(
            "assign_doctor",
            self.cases
                .assign_doctor(case_id, Some(doctor.clone()))
                .cloned(),
        )?;

        let message = doctor_assigned_message(&case, &doctor);
        self.notifications
            .emit(NotificationKind::DoctorAssigned, message, case.clone());
        Ok(case)
    }

    /// Assign a roster doctor looked up by id.
    ///
    /// # Errors
    ///
    /// Returns [`EmergencyError::UnknownDoctor`] if the id is not on the roster, otherwise
    /// as [`EmergencyContext::assign_doctor`].
    pub fn assign_doctor_by_id(
        &mut self,
        case_id: &str,
        doctor_id: &str,
    ) -> EmergencyResult<EmergencyCase> {
        let doctor = reported(
            "assign_doctor_by_id",
            self.doctors
                .find(doctor_id)
                .cloned()
                .ok_or_else(|| EmergencyError::UnknownDoctor(doctor_id.to_owned())),
        )?;
        self.assign_doctor(case_id, Some(doctor))
    }

    /// Select the doctor on duty. Emits no notification.
    ///
    /// # Errors
    ///
    /// Returns [`EmergencyError::UnknownDoctor`] for an id not on the roster; the current
    /// doctor is left unchanged.
    pub fn switch_doctor(&mut self, doctor_id: &str) -> EmergencyResult<&Doctor> {
        let doctor = reported("switch_doctor", self.doctors.switch_doctor(doctor_id))?;
        tracing::info!(doctor_id = %doctor.id, "switched doctor on duty");
        Ok(doctor)
    }

    /// Remove one notification. Unknown ids are ignored; returns whether one was removed.
    pub fn clear_notification(&mut self, id: NotificationId) -> bool {
        let cleared = self.notifications.clear(id);
        tracing::debug!(notification_id = %id, cleared, "clear notification");
        cleared
    }

    pub fn case_summary(&self) -> CaseSummary {
        reports::case_summary(self.cases.cases())
    }

    pub fn doctor_statistics(&self) -> Vec<DoctorStats> {
        reports::doctor_statistics(self.doctors.doctors(), self.cases.cases())
    }

    pub fn export_cases_json(&self) -> EmergencyResult<String> {
        reports::export_cases_json(self.cases.cases())
    }
}
