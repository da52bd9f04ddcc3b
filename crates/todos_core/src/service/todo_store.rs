//! Todo store use-case service.
//!
//! # Responsibility
//! - Validate candidate input before any store access.
//! - Sanitize free-text fields before they are persisted.
//! - Shape repository results into `OperationResult`/`ReadOutcome` values.
//!
//! # Invariants
//! - A candidate with field errors never reaches the repository.
//! - Validation failures and missing rows are data, not errors.
//! - Store failures propagate from list/create/update/delete. Reads catch
//!   them, log a warning, and report them as `ReadOutcome::StoreError`.
//! - Log events carry ids and counts only, never todo text.

use crate::model::todo::{
    parse_new, parse_patch, FieldError, NewTodo, TodoId, TodoInput, TodoItem, TodoPatch,
};
use crate::repo::todo_repo::{RepoError, RepoResult, SortOrder, TodoListQuery, TodoRepository};
use crate::service::sanitize::sanitize_text;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

/// Outcome of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub success: bool,
    pub not_found: bool,
    /// Field errors in check order. Empty unless the candidate was rejected.
    pub validation: Vec<FieldError>,
    pub item: Option<TodoItem>,
}

impl OperationResult {
    fn stored(item: TodoItem) -> Self {
        Self {
            success: true,
            not_found: false,
            validation: Vec::new(),
            item: Some(item),
        }
    }

    fn rejected(validation: Vec<FieldError>) -> Self {
        Self {
            success: false,
            not_found: false,
            validation,
            item: None,
        }
    }

    fn missing() -> Self {
        Self {
            success: false,
            not_found: true,
            validation: Vec::new(),
            item: None,
        }
    }
}

/// Outcome of a single-item read.
#[derive(Debug)]
pub enum ReadOutcome {
    Found(TodoItem),
    NotFound,
    /// The store failed; the failure has already been logged.
    StoreError(RepoError),
}

impl ReadOutcome {
    /// Collapses the outcome to best-effort semantics: a store failure reads
    /// the same as a missing row.
    pub fn into_item(self) -> Option<TodoItem> {
        match self {
            Self::Found(item) => Some(item),
            Self::NotFound | Self::StoreError(_) => None,
        }
    }

    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreError(_))
    }
}

/// Interprets a caller-supplied completion filter. Only the exact strings
/// `true` and `false` filter; anything else lists every todo.
pub fn completed_filter(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Todo CRUD facade over a repository implementation.
pub struct TodoStore<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoStore<R> {
    /// Creates a store over the provided repository (and its store handle).
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists todos ordered by creation time, ties broken by ascending id.
    ///
    /// `order` is `desc` (any case) for newest first, otherwise oldest first.
    /// `completed` filters only when it is exactly `"true"` or `"false"`.
    pub fn list_todos(
        &self,
        order: Option<&str>,
        completed: Option<&str>,
    ) -> RepoResult<Vec<TodoItem>> {
        let query = TodoListQuery {
            order: SortOrder::from_param(order),
            completed: completed_filter(completed),
        };
        let todos = self.repo.list_todos(&query).map_err(|err| {
            error!("event=todo_list module=store status=error error={err}");
            err
        })?;
        debug!(
            "event=todo_list module=store status=ok order={:?} completed={:?} count={}",
            query.order,
            query.completed,
            todos.len()
        );
        Ok(todos)
    }

    /// Reads one todo by id. Never fails; see `ReadOutcome`.
    pub fn read_todo(&self, id: TodoId) -> ReadOutcome {
        match self.repo.get_todo(id) {
            Ok(Some(item)) => ReadOutcome::Found(item),
            Ok(None) => ReadOutcome::NotFound,
            Err(err) => {
                warn!("event=todo_read module=store status=degraded id={id} error={err}");
                ReadOutcome::StoreError(err)
            }
        }
    }

    /// Validates, sanitizes and inserts a new todo.
    ///
    /// Only `title`, `due` and `position` are used; `completed` always starts
    /// as `false`.
    pub fn create_todo(&self, input: &TodoInput) -> RepoResult<OperationResult> {
        let todo = match parse_new(input) {
            Ok(todo) => todo,
            Err(errors) => {
                debug!(
                    "event=todo_create module=store status=invalid error_count={}",
                    errors.len()
                );
                return Ok(OperationResult::rejected(errors));
            }
        };

        let todo = NewTodo {
            title: sanitize_text(&todo.title),
            due: todo.due.as_deref().map(sanitize_text),
            position: todo.position,
        };
        let item = self.repo.insert_todo(&todo).map_err(|err| {
            error!("event=todo_create module=store status=error error={err}");
            err
        })?;

        info!("event=todo_create module=store status=ok id={}", item.id);
        Ok(OperationResult::stored(item))
    }

    /// Applies a partial update. Absent fields are left unchanged; `updated`
    /// is refreshed even when no field is supplied.
    pub fn update_todo(&self, id: TodoId, input: &TodoInput) -> RepoResult<OperationResult> {
        let patch = match parse_patch(input) {
            Ok(patch) => patch,
            Err(errors) => {
                debug!(
                    "event=todo_update module=store status=invalid id={id} error_count={}",
                    errors.len()
                );
                return Ok(OperationResult::rejected(errors));
            }
        };

        let patch = TodoPatch {
            title: patch.title.as_deref().map(sanitize_text),
            due: patch.due.as_deref().map(sanitize_text),
            ..patch
        };
        let updated = self.repo.update_todo(id, &patch).map_err(|err| {
            error!("event=todo_update module=store status=error id={id} error={err}");
            err
        })?;

        match updated {
            Some(item) => {
                info!("event=todo_update module=store status=ok id={id}");
                Ok(OperationResult::stored(item))
            }
            None => {
                debug!("event=todo_update module=store status=not_found id={id}");
                Ok(OperationResult::missing())
            }
        }
    }

    /// Deletes one todo. Returns whether exactly one row was removed.
    pub fn delete_todo(&self, id: TodoId) -> RepoResult<bool> {
        let deleted = self.repo.delete_todo(id).map_err(|err| {
            error!("event=todo_delete module=store status=error id={id} error={err}");
            err
        })?;
        info!("event=todo_delete module=store status=ok id={id} deleted={deleted}");
        Ok(deleted)
    }
}
