use chrono::NaiveDate;
use dailyink_core::{
    Entry, EntryDraft, EntryId, EntryPatch, EntryRepository, FixedClock, JournalStore,
    MemoryEntryRepository, RepoError, RepoResult, StoreOutcome,
};
use std::cell::Cell;
use std::sync::Arc;

/// Memory repository that can be switched offline or made to answer with
/// stale timestamps.
struct FlakyRepository {
    inner: MemoryEntryRepository,
    offline: Cell<bool>,
    stale_updates: Cell<bool>,
}

impl FlakyRepository {
    fn check(&self) -> RepoResult<()> {
        if self.offline.get() {
            return Err(RepoError::Unavailable("backend offline".to_string()));
        }
        Ok(())
    }
}

impl EntryRepository for FlakyRepository {
    fn list(&self) -> RepoResult<Vec<Entry>> {
        self.check()?;
        self.inner.list()
    }

    fn create(&self, draft: &EntryDraft) -> RepoResult<Entry> {
        self.check()?;
        self.inner.create(draft)
    }

    fn update(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        self.check()?;
        let mut saved = self.inner.update(id, patch)?;
        if self.stale_updates.get() {
            saved.last_modified = 0;
        }
        Ok(saved)
    }
}

fn fixture() -> (FlakyRepository, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        10_000,
    ));
    let repo = FlakyRepository {
        inner: MemoryEntryRepository::new(clock.clone()),
        offline: Cell::new(false),
        stale_updates: Cell::new(false),
    };
    (repo, clock)
}

#[test]
fn failed_create_leaves_no_current_entry() {
    let (repo, clock) = fixture();
    let mut store = JournalStore::new(&repo, clock);

    repo.offline.set(true);
    assert_eq!(store.create_entry(Some(10)), StoreOutcome::PersistenceFailed);
    assert!(store.current_entry().is_none());
    assert!(store.entries().is_empty());
    assert_eq!(store.stats().total_entries, 0);

    repo.offline.set(false);
    assert!(store.create_entry(Some(10)).is_saved());
}

#[test]
fn failed_update_keeps_previous_content_and_stats() {
    let (repo, clock) = fixture();
    let mut store = JournalStore::new(&repo, clock);
    store.create_entry(Some(10));
    store.update_entry("two words");

    repo.offline.set(true);
    assert_eq!(
        store.update_entry("two words and then some"),
        StoreOutcome::PersistenceFailed
    );
    let current = store.current_entry().unwrap();
    assert_eq!(current.content, "two words");
    assert_eq!(store.stats().total_word_count, 2);

    repo.offline.set(false);
    assert!(store.update_entry("two words and then some").is_saved());
    assert_eq!(store.stats().total_word_count, 5);
}

#[test]
fn failed_goal_write_leaves_entry_unlocked() {
    let (repo, clock) = fixture();
    let mut store = JournalStore::new(&repo, clock);
    store.create_entry(Some(3));

    repo.offline.set(true);
    assert_eq!(
        store.update_entry("one two three"),
        StoreOutcome::PersistenceFailed
    );
    assert!(!store.current_entry().unwrap().is_completed);
    assert_eq!(store.complete_entry(), StoreOutcome::PersistenceFailed);
    assert!(!store.current_entry().unwrap().is_completed);
}

#[test]
fn failed_fetch_keeps_loaded_entries() {
    let (repo, clock) = fixture();
    let mut store = JournalStore::new(&repo, clock);
    store.create_entry(Some(10));
    store.update_entry("still here");

    repo.offline.set(true);
    assert_eq!(store.fetch_entries(), StoreOutcome::PersistenceFailed);
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.current_entry().unwrap().content, "still here");
}

#[test]
fn stale_response_is_discarded() {
    let (repo, clock) = fixture();
    let mut store = JournalStore::new(&repo, clock);
    store.create_entry(Some(10));
    store.update_entry("fresh state");

    repo.stale_updates.set(true);
    assert_eq!(
        store.update_entry("fresh state overtaken"),
        StoreOutcome::Superseded
    );
    assert_eq!(store.current_entry().unwrap().content, "fresh state");
    assert_eq!(store.stats().total_word_count, 2);

    // A full reload converges on what the backend actually stored.
    repo.stale_updates.set(false);
    store.fetch_entries();
    assert_eq!(store.current_entry().unwrap().content, "fresh state overtaken");
    assert_eq!(store.stats().total_word_count, 3);
}
