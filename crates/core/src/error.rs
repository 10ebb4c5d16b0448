use crate::cases::CaseStatus;

#[derive(Debug, thiserror::Error)]
pub enum EmergencyError {
    #[error("no case data supplied")]
    MissingCaseData,
    #[error("case id is required")]
    MissingCaseId,
    #[error("doctor is required")]
    MissingDoctor,
    #[error("emergency case not found: {0}")]
    CaseNotFound(String),
    #[error("emergency case already exists: {0}")]
    DuplicateCaseId(String),
    #[error("unknown doctor: {0}")]
    UnknownDoctor(String),
    #[error("emergency case {0} is resolved and can no longer change")]
    CaseResolved(String),
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: CaseStatus, to: CaseStatus },
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read doctor roster: {0}")]
    RosterRead(std::io::Error),
    #[error("doctor roster schema mismatch: {0}")]
    RosterParse(String),
    #[error("failed to serialize cases: {0}")]
    Serialization(serde_json::Error),

    #[error(transparent)]
    CaseId(#[from] er_case_id::CaseIdError),
    #[error("invalid text: {0}")]
    Text(#[from] er_types::TextError),
}

pub type EmergencyResult<T> = std::result::Result<T, EmergencyError>;
