//! Core domain logic for DailyInk.
//! This crate is the single source of truth for journaling invariants:
//! the word-count gated edit lock, entry lifecycle and writing statistics.

pub mod clock;
pub mod config;
pub mod db;
pub mod guard;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;
pub mod text;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{default_db_path, ConfigError, JournalConfig};
pub use guard::edit_guard::{
    evaluate_edit, prefilter_input, AcceptedEdit, EditDecision, EntryPhase, InputEvent,
    InputVerdict, RejectReason, Selection,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{Entry, EntryDraft, EntryId, EntryPatch, EntryValidationError};
pub use repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
pub use repo::memory_repo::MemoryEntryRepository;
pub use service::journal_store::{InputOutcome, JournalStore, StoreOutcome};
pub use stats::aggregator::{recompute, streak_days, Contribution, Insights, Stats, StatsAggregator};
pub use stats::heatmap::{
    bucket, month_grid, BucketThresholds, DayCell, HeatmapError, IntensityLevel, MonthGrid,
    Threshold,
};
pub use text::word_count::count_words;

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
