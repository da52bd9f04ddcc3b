//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the todo data access contract.
//! - Isolate SQLite query details from the todo store orchestration.
//!
//! # Invariants
//! - Repositories receive already validated and sanitized values.
//! - Not-found is reported as data (`None`/`false`), not as an error.

pub mod todo_repo;
