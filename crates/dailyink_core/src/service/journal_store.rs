//! Journal entry store.
//!
//! # Responsibility
//! - Own the in-memory entry collection and the current-entry pointer.
//! - Route every content change through the edit guard before persisting.
//! - Keep aggregate statistics in step with persisted writes.
//!
//! # Invariants
//! - In-memory state only changes after the repository confirms a write.
//! - Repository failures are logged and reported as an outcome, never raised.
//! - At most one current entry; it always points into `entries`.
//! - A saved entry older than the in-memory copy is discarded.

use crate::clock::Clock;
use crate::config::{JournalConfig, DEFAULT_TARGET_WORD_COUNT};
use crate::guard::edit_guard::{
    evaluate_edit, prefilter_input, EditDecision, InputEvent, InputVerdict, RejectReason,
};
use crate::model::entry::{Entry, EntryDraft, EntryId, EntryPatch};
use crate::repo::entry_repo::EntryRepository;
use crate::stats::aggregator::{Contribution, Insights, Stats, StatsAggregator};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Result of a store operation. None of these are errors for the caller;
/// failures have already been logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The repository confirmed the write; this is the stored entry.
    Saved(Entry),
    /// Entries reloaded from the repository.
    Loaded { entries: usize },
    /// Nothing to write (identical content, already completed).
    Unchanged,
    /// Today's entry already exists and stays current.
    AlreadyInProgress(EntryId),
    /// The edit guard refused the change.
    Rejected(RejectReason),
    NoCurrentEntry,
    /// A newer in-memory state already replaced this response.
    Superseded,
    PersistenceFailed,
}

impl StoreOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Outcome of a raw editor input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOutcome {
    pub verdict: InputVerdict,
    /// Present when the verdict rewrote the content and it was submitted.
    pub update: Option<StoreOutcome>,
}

/// Daily journal store over an injected repository and clock.
pub struct JournalStore<R: EntryRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
    default_target_word_count: u32,
    entries: Vec<Entry>,
    current: Option<EntryId>,
    stats: StatsAggregator,
}

impl<R: EntryRepository> JournalStore<R> {
    /// Creates an empty store. Call `fetch_entries` to load persisted state.
    pub fn new(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            default_target_word_count: DEFAULT_TARGET_WORD_COUNT,
            entries: Vec::new(),
            current: None,
            stats: StatsAggregator::new(),
        }
    }

    pub fn with_config(repo: R, clock: Arc<dyn Clock>, config: &JournalConfig) -> Self {
        let mut store = Self::new(repo, clock);
        store.default_target_word_count = config.default_target_word_count;
        store
    }

    /// Starts today's entry unless one is already in progress.
    ///
    /// A current entry from an earlier day is released once the new entry
    /// is persisted. `None` uses the configured default target.
    pub fn create_entry(&mut self, target_word_count: Option<u32>) -> StoreOutcome {
        let today = self.clock.today();
        if let Some(current) = self.current_entry() {
            if current.date == today {
                debug!(
                    "event=entry_create module=store status=skipped reason=in_progress entry_id={}",
                    current.id
                );
                return StoreOutcome::AlreadyInProgress(current.id);
            }
        }

        let target = target_word_count.unwrap_or(self.default_target_word_count);
        let draft = EntryDraft::empty(today, target);
        match self.repo.create(&draft) {
            Ok(saved) => {
                if let Some(previous) = self.current {
                    info!(
                        "event=entry_rollover module=store status=ok released_entry_id={previous}"
                    );
                }
                info!(
                    "event=entry_create module=store status=ok entry_id={} date={} target={}",
                    saved.id, saved.date, saved.target_word_count
                );
                self.stats.record_created(&saved);
                self.current = Some(saved.id);
                self.entries.push(saved.clone());
                StoreOutcome::Saved(saved)
            }
            Err(err) => {
                error!(
                    "event=entry_create module=store status=error date={today} target={target} error={err}"
                );
                StoreOutcome::PersistenceFailed
            }
        }
    }

    /// Proposes `content` as the current entry's full text.
    ///
    /// An edit that reaches the goal is persisted together with the
    /// completion flag.
    pub fn update_entry(&mut self, content: &str) -> StoreOutcome {
        let Some(current) = self.current_entry().cloned() else {
            warn!("event=entry_update module=store status=skipped reason=no_current_entry");
            return StoreOutcome::NoCurrentEntry;
        };

        let edit = match evaluate_edit(&current, content) {
            EditDecision::Accepted(edit) => edit,
            EditDecision::Rejected(reason) => {
                debug!(
                    "event=entry_update module=store status=rejected entry_id={} reason={reason:?}",
                    current.id
                );
                return StoreOutcome::Rejected(reason);
            }
        };

        if edit.content == current.content && !edit.completes {
            return StoreOutcome::Unchanged;
        }

        let patch = EntryPatch {
            content: Some(edit.content),
            word_count: Some(edit.word_count),
            is_completed: edit.completes.then_some(true),
        };
        self.persist_update(current.id, &patch, "entry_update")
    }

    /// Marks the current entry completed regardless of its word count.
    pub fn complete_entry(&mut self) -> StoreOutcome {
        let Some(current) = self.current_entry() else {
            warn!("event=entry_complete module=store status=skipped reason=no_current_entry");
            return StoreOutcome::NoCurrentEntry;
        };
        if current.is_completed {
            return StoreOutcome::Unchanged;
        }
        let id = current.id;
        self.persist_update(id, &EntryPatch::complete(), "entry_complete")
    }

    /// Runs an editor input event through the selection pre-filter.
    ///
    /// `content` is the editor's text at the time of the event. A rewritten
    /// paste is submitted through `update_entry` immediately.
    pub fn handle_input(&mut self, content: &str, event: &InputEvent<'_>) -> InputOutcome {
        let Some(current) = self.current_entry() else {
            warn!("event=entry_input module=store status=skipped reason=no_current_entry");
            return InputOutcome {
                verdict: InputVerdict::Block,
                update: None,
            };
        };

        let verdict = prefilter_input(current, content, event);
        let update = match &verdict {
            InputVerdict::Replace { content, .. } => Some(self.update_entry(content)),
            InputVerdict::Block | InputVerdict::PassThrough => None,
        };
        InputOutcome { verdict, update }
    }

    /// Reloads every entry from the repository and rebuilds statistics.
    ///
    /// The current entry is kept when it still exists; otherwise today's most
    /// recently written entry becomes current.
    pub fn fetch_entries(&mut self) -> StoreOutcome {
        let entries = match self.repo.list() {
            Ok(entries) => entries,
            Err(err) => {
                error!("event=entries_fetch module=store status=error error={err}");
                return StoreOutcome::PersistenceFailed;
            }
        };

        let today = self.clock.today();
        let kept = self
            .current
            .filter(|id| entries.iter().any(|entry| entry.id == *id));
        self.current = kept.or_else(|| {
            entries
                .iter()
                .filter(|entry| entry.date == today)
                .max_by_key(|entry| entry.last_modified)
                .map(|entry| entry.id)
        });
        self.stats = StatsAggregator::from_entries(&entries);
        self.entries = entries;

        info!(
            "event=entries_fetch module=store status=ok count={} total_words={} current={}",
            self.entries.len(),
            self.stats.total_word_count(),
            self.current.map_or_else(|| "none".to_string(), |id| id.to_string())
        );
        StoreOutcome::Loaded {
            entries: self.entries.len(),
        }
    }

    pub fn current_entry(&self) -> Option<&Entry> {
        let id = self.current?;
        self.get_entry_by_id(id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get_entry_by_id(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn get_entries_by_date(&self, date: NaiveDate) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.date == date)
            .collect()
    }

    /// Contributions for `month` (1-12) of `year`.
    pub fn get_contributions_by_month(&self, month: u32, year: i32) -> Vec<Contribution> {
        self.stats().contributions_in_month(month, year)
    }

    /// Statistics with the streak evaluated for the clock's current day.
    pub fn stats(&self) -> Stats {
        self.stats.snapshot(self.clock.today())
    }

    pub fn insights(&self) -> Insights {
        self.stats().insights()
    }

    fn persist_update(&mut self, id: EntryId, patch: &EntryPatch, event: &str) -> StoreOutcome {
        match self.repo.update(id, patch) {
            Ok(saved) => self.apply_saved(saved, event),
            Err(err) => {
                error!("event={event} module=store status=error entry_id={id} error={err}");
                StoreOutcome::PersistenceFailed
            }
        }
    }

    fn apply_saved(&mut self, saved: Entry, event: &str) -> StoreOutcome {
        let Some(slot) = self.entries.iter_mut().find(|entry| entry.id == saved.id) else {
            warn!(
                "event={event} module=store status=discarded reason=unknown_entry entry_id={}",
                saved.id
            );
            return StoreOutcome::Superseded;
        };
        if saved.last_modified < slot.last_modified {
            warn!(
                "event={event} module=store status=discarded reason=stale entry_id={} saved_at={} held_at={}",
                saved.id, saved.last_modified, slot.last_modified
            );
            return StoreOutcome::Superseded;
        }

        self.stats
            .apply_delta(saved.date, slot.word_count, saved.word_count);
        *slot = saved.clone();
        info!(
            "event={event} module=store status=ok entry_id={} word_count={} target={} completed={}",
            saved.id, saved.word_count, saved.target_word_count, saved.is_completed
        );
        StoreOutcome::Saved(saved)
    }
}
