//! Editing policy for in-progress entries.
//!
//! # Responsibility
//! - Decide whether a proposed content change may be applied.
//! - Rewrite or block raw input events that could shrink an entry under goal.
//!
//! # Invariants
//! - A completed entry never accepts a content change.
//! - Under goal, an accepted change never lowers the word count.

pub mod edit_guard;
