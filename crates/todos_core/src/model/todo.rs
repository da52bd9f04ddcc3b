//! Todo item domain model and input validation.
//!
//! # Responsibility
//! - Define the persisted `TodoItem` record.
//! - Define the loosely-typed `TodoInput` candidate accepted from callers and
//!   turn it into typed `NewTodo`/`TodoPatch` values, or field errors.
//!
//! # Invariants
//! - A field counts as absent only when it is `None` (JSON `null`). Empty
//!   strings, `0` and `false` are present values and are checked.
//! - Field errors are reported in the order title, due, position, completed.

use crate::model::iso8601::is_iso8601;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Store-assigned todo identifier.
pub type TodoId = i64;

/// Minimum title length in characters.
pub const TITLE_MIN_CHARS: usize = 1;
/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 128;

/// Persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    /// ISO 8601 string as supplied (after sanitization).
    pub due: Option<String>,
    pub position: Option<i64>,
    pub completed: bool,
    /// Unix epoch milliseconds, set on insert.
    pub created: i64,
    /// Unix epoch milliseconds, refreshed on every update. Never below `created`.
    pub updated: i64,
}

/// Candidate field values as received from a caller.
///
/// Values are kept untyped so that shape errors (a numeric title, a string
/// position) can be reported as field errors instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<Value>,
}

impl TodoInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<Value>) -> Self {
        self.title = present(title.into());
        self
    }

    pub fn with_due(mut self, due: impl Into<Value>) -> Self {
        self.due = present(due.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<Value>) -> Self {
        self.position = present(position.into());
        self
    }

    pub fn with_completed(mut self, completed: impl Into<Value>) -> Self {
        self.completed = present(completed.into());
        self
    }

    /// Returns whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.due.is_none()
            && self.position.is_none()
            && self.completed.is_none()
    }
}

// An explicit JSON null is the absent sentinel, same as serde's decoding.
fn present(value: Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// Validated fields for inserting a todo. Absent optionals use column defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub due: Option<String>,
    pub position: Option<i64>,
}

/// Validated partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub due: Option<String>,
    pub position: Option<i64>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Returns whether the patch changes no column.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.due.is_none()
            && self.position.is_none()
            && self.completed.is_none()
    }
}

/// Todo field names used in validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoField {
    Title,
    Due,
    Position,
    Completed,
}

impl TodoField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Due => "due",
            Self::Position => "position",
            Self::Completed => "completed",
        }
    }

    fn rule(self) -> &'static str {
        match self {
            Self::Title => "title must be a string of 1 to 128 characters",
            Self::Due => "due must be a valid ISO 8601 date",
            Self::Position => "position must be an integer greater than or equal to 0",
            Self::Completed => "completed must be a boolean",
        }
    }
}

/// One offending field in a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: TodoField,
    pub message: String,
}

impl FieldError {
    fn rejected(field: TodoField) -> Self {
        Self {
            field,
            message: field.rule().to_string(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// Validates a candidate. `patching` makes an absent title acceptable.
///
/// Returns an empty list when the candidate is valid.
pub fn validate(input: &TodoInput, patching: bool) -> Vec<FieldError> {
    check(input, patching).1
}

/// Parses a candidate for creation. `completed` is ignored, whatever its value.
pub fn parse_new(input: &TodoInput) -> Result<NewTodo, Vec<FieldError>> {
    let candidate = TodoInput {
        completed: None,
        ..input.clone()
    };
    let (patch, errors) = check(&candidate, false);
    if !errors.is_empty() {
        return Err(errors);
    }
    let Some(title) = patch.title else {
        return Err(vec![FieldError::rejected(TodoField::Title)]);
    };
    Ok(NewTodo {
        title,
        due: patch.due,
        position: patch.position,
    })
}

/// Parses a candidate as a partial update.
pub fn parse_patch(input: &TodoInput) -> Result<TodoPatch, Vec<FieldError>> {
    let (patch, errors) = check(input, true);
    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

fn check(input: &TodoInput, patching: bool) -> (TodoPatch, Vec<FieldError>) {
    let mut patch = TodoPatch::default();
    let mut errors = Vec::new();

    if !patching || input.title.is_some() {
        match input.title.as_ref().and_then(Value::as_str) {
            Some(title) if title_len_ok(title) => patch.title = Some(title.to_string()),
            _ => errors.push(FieldError::rejected(TodoField::Title)),
        }
    }

    if let Some(due) = &input.due {
        match due.as_str() {
            Some(due) if is_iso8601(due) => patch.due = Some(due.to_string()),
            _ => errors.push(FieldError::rejected(TodoField::Due)),
        }
    }

    if let Some(position) = &input.position {
        match position.as_i64() {
            Some(position) if position >= 0 => patch.position = Some(position),
            _ => errors.push(FieldError::rejected(TodoField::Position)),
        }
    }

    if let Some(completed) = &input.completed {
        match completed.as_bool() {
            Some(completed) => patch.completed = Some(completed),
            None => errors.push(FieldError::rejected(TodoField::Completed)),
        }
    }

    (patch, errors)
}

fn title_len_ok(title: &str) -> bool {
    (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title.chars().count())
}
