//! Local-only entry repository.
//!
//! Mirrors the SQLite contract over an in-process vector, for sessions that
//! keep their journal in memory and for tests.

use crate::clock::Clock;
use crate::model::entry::{Entry, EntryDraft, EntryId, EntryPatch};
use crate::repo::entry_repo::{EntryRepository, RepoError, RepoResult};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub struct MemoryEntryRepository {
    entries: Mutex<Vec<Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryEntryRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_entries(clock, Vec::new())
    }

    /// Seeds the repository with already-persisted entries.
    pub fn with_entries(clock: Arc<dyn Clock>, entries: Vec<Entry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            clock,
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Vec<Entry>>> {
        self.entries
            .lock()
            .map_err(|_| RepoError::Unavailable("memory entry store lock poisoned".to_string()))
    }
}

impl EntryRepository for MemoryEntryRepository {
    fn list(&self) -> RepoResult<Vec<Entry>> {
        let mut entries = self.lock()?.clone();
        entries.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.last_modified.cmp(&a.last_modified))
                .then(a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    fn create(&self, draft: &EntryDraft) -> RepoResult<Entry> {
        draft.validate()?;
        let entry = draft.clone().into_entry(Uuid::new_v4(), self.clock.now_ms());
        self.lock()?.push(entry.clone());
        Ok(entry)
    }

    fn update(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        let mut entries = self.lock()?;
        let slot = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(RepoError::NotFound(id))?;
        let mut next = slot.patched(patch)?;
        next.last_modified = self.clock.now_ms();
        *slot = next.clone();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEntryRepository;
    use crate::clock::FixedClock;
    use crate::model::entry::{EntryDraft, EntryPatch, EntryValidationError};
    use crate::repo::entry_repo::{EntryRepository, RepoError};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use uuid::Uuid;

    fn repo() -> MemoryEntryRepository {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 10);
        MemoryEntryRepository::new(Arc::new(clock))
    }

    #[test]
    fn create_assigns_id_and_stamp() {
        let repo = repo();
        let draft = EntryDraft::empty(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 50);
        let created = repo.create(&draft).unwrap();
        assert_eq!(created.last_modified, 10);
        assert_eq!(repo.list().unwrap(), vec![created]);
    }

    #[test]
    fn update_stamps_a_newer_timestamp() {
        let repo = repo();
        let draft = EntryDraft::empty(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 50);
        let created = repo.create(&draft).unwrap();
        let updated = repo
            .update(created.id, &EntryPatch::content("hello there"))
            .unwrap();
        assert_eq!(updated.word_count, 2);
        assert!(updated.last_modified > created.last_modified);
    }

    #[test]
    fn completed_entry_refuses_content_writes() {
        let repo = repo();
        let draft = EntryDraft::empty(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 1);
        let created = repo.create(&draft).unwrap();
        let done = repo
            .update(
                created.id,
                &EntryPatch {
                    is_completed: Some(true),
                    ..EntryPatch::content("finished")
                },
            )
            .unwrap();
        assert!(done.is_completed);

        let err = repo
            .update(created.id, &EntryPatch::content("rewritten"))
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(EntryValidationError::Locked(id)) if id == created.id
        ));
        assert_eq!(repo.list().unwrap()[0].content, "finished");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let repo = repo();
        let missing = Uuid::new_v4();
        let err = repo.update(missing, &EntryPatch::complete()).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == missing));
    }

    #[test]
    fn list_orders_by_date_descending() {
        let repo = repo();
        let older = repo
            .create(&EntryDraft::empty(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5))
            .unwrap();
        let newer = repo
            .create(&EntryDraft::empty(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(), 5))
            .unwrap();
        let ids: Vec<_> = repo.list().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
