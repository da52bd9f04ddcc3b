//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, sanitization and repository calls into the
//!   todo store API.
//! - Keep CLI callers decoupled from storage details.

pub mod sanitize;
pub mod todo_store;
