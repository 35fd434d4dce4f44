use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> MessageBody {
        MessageBody {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReorderBody {
    pub ids: Vec<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveBody {
    pub to_index: usize,
}

/// Unwraps a required text field, rejecting absent and blank values.
pub fn require_text(field: &'static str, value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::MissingField { field }),
    }
}

pub fn require<T>(field: &'static str, value: Option<T>) -> Result<T, Error> {
    value.ok_or(Error::MissingField { field })
}

/// Treats blank optional text the same as an absent value.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn default_true() -> bool {
    true
}
