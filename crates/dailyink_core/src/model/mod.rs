//! Journal domain model.
//!
//! # Responsibility
//! - Define the entry record shared by the store, repositories and stats.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - `word_count` is always derived from `content`.

pub mod entry;
