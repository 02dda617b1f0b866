use shared::error::{InvalidFieldValue, UnknownField};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Enrichment,
    Persistence,
    Edit,
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("description enrichment failed: {0}")]
    Enrichment(String),
    #[error("saving player failed: {0}")]
    Persistence(String),
    #[error("no player is selected")]
    NoSelection,
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
    #[error(transparent)]
    InvalidField(#[from] InvalidFieldValue),
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error("the edit dialog is not open")]
    EditorClosed,
    #[error("roster session is not mounted")]
    Unmounted,
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Fetch(_) => FailureKind::Fetch,
            ClientError::Enrichment(_) => FailureKind::Enrichment,
            ClientError::Persistence(_) => FailureKind::Persistence,
            ClientError::UnknownField(_)
            | ClientError::InvalidField(_)
            | ClientError::NoSelection
            | ClientError::EditorClosed => FailureKind::Edit,
            ClientError::SaveInProgress | ClientError::Unmounted => FailureKind::Session,
        }
    }
}
