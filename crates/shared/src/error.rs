use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PlayerField;

/// Error body returned by the backend and the description service on
/// non-success responses. Either key may be used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            message: None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown or read-only field `{0}`")]
pub struct UnknownField(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}` expects a whole number, got {value:?}")]
pub struct InvalidFieldValue {
    pub field: PlayerField,
    pub value: String,
}
