//! Journal use-case services.
//!
//! # Responsibility
//! - Orchestrate edit policy, persistence and statistics into use-case APIs.
//! - Keep callers decoupled from the concrete repository backend.

pub mod journal_store;
