//! Core data-access layer for todo items.
//! This crate is the single source of truth for todo validation and storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::TodosConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::iso8601::is_iso8601;
pub use model::todo::{
    validate, FieldError, NewTodo, TodoField, TodoId, TodoInput, TodoItem, TodoPatch,
};
pub use repo::todo_repo::{
    RepoError, RepoResult, SortOrder, SqliteTodoRepository, TodoListQuery, TodoRepository,
};
pub use service::sanitize::sanitize_text;
pub use service::todo_store::{completed_filter, OperationResult, ReadOutcome, TodoStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
