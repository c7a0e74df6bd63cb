//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the `EntryRepository` seam consumed by `JournalStore`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `list` returns entries by date descending, newest write first per day.
//! - `update` on an unknown id returns `RepoError::NotFound`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::clock::Clock;
use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::entry::{Entry, EntryDraft, EntryId, EntryPatch, EntryValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    content,
    entry_date,
    word_count,
    target_word_count,
    is_completed,
    last_modified
FROM entries";

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    InvalidData(String),
    /// Backend is unreachable or refused the call.
    Unavailable(String),
    /// Connection was not migrated to the schema this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::Unavailable(message) => write!(f, "entry store unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator for journal entries.
pub trait EntryRepository {
    /// All entries, date descending.
    fn list(&self) -> RepoResult<Vec<Entry>>;
    /// Persists a draft, assigning id and timestamp.
    fn create(&self, draft: &EntryDraft) -> RepoResult<Entry>;
    /// Applies a partial update by id and returns the stored entry.
    fn update(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry>;
}

impl<R: EntryRepository + ?Sized> EntryRepository for &R {
    fn list(&self) -> RepoResult<Vec<Entry>> {
        (**self).list()
    }

    fn create(&self, draft: &EntryDraft) -> RepoResult<Entry> {
        (**self).create(draft)
    }

    fn update(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        (**self).update(id, patch)
    }
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
    clock: Arc<dyn Clock>,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection, clock: Arc<dyn Clock>) -> RepoResult<Self> {
        let actual_version = current_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn, clock })
    }

    fn get(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let raw = stmt
            .query_row([id.to_string()], read_raw_row)
            .optional()?;
        raw.map(RawEntryRow::into_entry).transpose()
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn list(&self) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL} ORDER BY entry_date DESC, last_modified DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(read_raw_row(row)?.into_entry()?);
        }
        Ok(entries)
    }

    fn create(&self, draft: &EntryDraft) -> RepoResult<Entry> {
        draft.validate()?;
        let entry = draft.clone().into_entry(Uuid::new_v4(), self.clock.now_ms());

        self.conn.execute(
            "INSERT INTO entries (
                id,
                content,
                entry_date,
                word_count,
                target_word_count,
                is_completed,
                last_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                entry.id.to_string(),
                entry.content.as_str(),
                entry.date.format(DATE_FORMAT).to_string(),
                entry.word_count,
                entry.target_word_count,
                entry.is_completed,
                entry.last_modified,
            ],
        )?;

        Ok(entry)
    }

    fn update(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        let tx = self.conn.unchecked_transaction()?;
        let current = self.get(id)?.ok_or(RepoError::NotFound(id))?;
        let mut next = current.patched(patch)?;
        next.last_modified = self.clock.now_ms();

        let changed = tx.execute(
            "UPDATE entries
             SET
                content = ?2,
                word_count = ?3,
                is_completed = ?4,
                last_modified = ?5
             WHERE id = ?1;",
            params![
                id.to_string(),
                next.content.as_str(),
                next.word_count,
                next.is_completed,
                next.last_modified,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        Ok(next)
    }
}

struct RawEntryRow {
    id: String,
    content: String,
    date: String,
    word_count: i64,
    target_word_count: i64,
    is_completed: i64,
    last_modified: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawEntryRow> {
    Ok(RawEntryRow {
        id: row.get("id")?,
        content: row.get("content")?,
        date: row.get("entry_date")?,
        word_count: row.get("word_count")?,
        target_word_count: row.get("target_word_count")?,
        is_completed: row.get("is_completed")?,
        last_modified: row.get("last_modified")?,
    })
}

impl RawEntryRow {
    fn into_entry(self) -> RepoResult<Entry> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{}` in entries.id", self.id))
        })?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date value `{}` in entries.entry_date",
                self.date
            ))
        })?;
        let word_count = u32::try_from(self.word_count).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid word_count `{}` in entries.word_count",
                self.word_count
            ))
        })?;
        let target_word_count = u32::try_from(self.target_word_count).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid target `{}` in entries.target_word_count",
                self.target_word_count
            ))
        })?;
        let is_completed = match self.is_completed {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid is_completed value `{other}` in entries.is_completed"
                )));
            }
        };

        let entry = Entry {
            id,
            content: self.content,
            date,
            word_count,
            target_word_count,
            is_completed,
            last_modified: self.last_modified,
        };
        entry.validate()?;
        Ok(entry)
    }
}
