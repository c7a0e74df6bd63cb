//! Derived writing statistics.
//!
//! # Responsibility
//! - Aggregate totals, per-day contributions and streaks from entries.
//! - Bucket per-day word counts into heat-map intensity levels.
//!
//! # Invariants
//! - Everything here is recomputable from the entry collection alone.

pub mod aggregator;
pub mod heatmap;
