//! Persistence collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the list/create/update-by-id contract the journal store consumes.
//! - Provide interchangeable durable (SQLite) and local-only (memory) backends.
//!
//! # Invariants
//! - Every write validates the resulting entry before it is stored.
//! - The backend, not the caller, assigns ids and stamps `last_modified`.

pub mod entry_repo;
pub mod memory_repo;
