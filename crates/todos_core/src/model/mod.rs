//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its candidate/validated input shapes.
//! - Keep field validation pure: no storage access happens here.

pub mod iso8601;
pub mod todo;
