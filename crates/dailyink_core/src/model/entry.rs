//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical daily entry record and its write shapes.
//! - Validate derived fields before persistence.
//!
//! # Invariants
//! - `id` and `date` never change after creation.
//! - `word_count == count_words(content)`.
//! - `is_completed` only ever moves from `false` to `true`.
//! - A completed entry's content is frozen.

use crate::text::word_count::count_words;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the persistence layer.
pub type EntryId = Uuid;

/// One day's writing session record.
///
/// Field names serialize in camelCase to match the external entry shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub content: String,
    /// Local calendar day, serialized as `yyyy-MM-dd`.
    pub date: NaiveDate,
    pub word_count: u32,
    pub target_word_count: u32,
    pub is_completed: bool,
    /// Unix epoch milliseconds of the last persisted write.
    pub last_modified: i64,
}

/// Write shape for entry creation. The store assigns `id` and `last_modified`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub content: String,
    pub date: NaiveDate,
    pub word_count: u32,
    pub target_word_count: u32,
    pub is_completed: bool,
}

/// Partial update applied by id. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    pub content: Option<String>,
    pub word_count: Option<u32>,
    pub is_completed: Option<bool>,
}

/// Entry validation failures raised before a write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    ZeroTarget,
    WordCountMismatch { stored: u32, derived: u32 },
    Reopened(EntryId),
    Locked(EntryId),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTarget => write!(f, "target_word_count must be greater than zero"),
            Self::WordCountMismatch { stored, derived } => write!(
                f,
                "word_count {stored} does not match content word count {derived}"
            ),
            Self::Reopened(id) => write!(f, "entry {id} is completed and cannot be reopened"),
            Self::Locked(id) => write!(f, "entry {id} is completed and its content is read-only"),
        }
    }
}

impl Error for EntryValidationError {}

impl Entry {
    /// Whether the entry has reached its word-count goal.
    pub fn goal_reached(&self) -> bool {
        self.word_count >= self.target_word_count
    }

    /// Words still missing before the goal; zero once reached.
    pub fn words_remaining(&self) -> u32 {
        self.target_word_count.saturating_sub(self.word_count)
    }

    /// Checks derived-field consistency.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_fields(&self.content, self.word_count, self.target_word_count)
    }

    /// Returns a copy with `patch` applied, without stamping a timestamp.
    ///
    /// # Errors
    /// - `Locked` when the patch touches content of a completed entry.
    /// - `Reopened` when the patch tries to clear a completed flag.
    /// - Any `validate()` failure on the patched record.
    pub fn patched(&self, patch: &EntryPatch) -> Result<Entry, EntryValidationError> {
        if self.is_completed && (patch.content.is_some() || patch.word_count.is_some()) {
            return Err(EntryValidationError::Locked(self.id));
        }
        let mut next = self.clone();
        if let Some(content) = &patch.content {
            next.content = content.clone();
        }
        if let Some(word_count) = patch.word_count {
            next.word_count = word_count;
        }
        if let Some(is_completed) = patch.is_completed {
            if self.is_completed && !is_completed {
                return Err(EntryValidationError::Reopened(self.id));
            }
            next.is_completed = is_completed;
        }
        next.validate()?;
        Ok(next)
    }
}

impl EntryDraft {
    /// Draft for a fresh, empty entry on `date`.
    pub fn empty(date: NaiveDate, target_word_count: u32) -> Self {
        Self {
            content: String::new(),
            date,
            word_count: 0,
            target_word_count,
            is_completed: false,
        }
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_fields(&self.content, self.word_count, self.target_word_count)
    }

    /// Materializes the draft with a store-assigned identity and timestamp.
    pub fn into_entry(self, id: EntryId, last_modified: i64) -> Entry {
        Entry {
            id,
            content: self.content,
            date: self.date,
            word_count: self.word_count,
            target_word_count: self.target_word_count,
            is_completed: self.is_completed,
            last_modified,
        }
    }
}

impl EntryPatch {
    /// Content replacement with its derived word count.
    pub fn content(content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = count_words(&content);
        Self {
            content: Some(content),
            word_count: Some(word_count),
            is_completed: None,
        }
    }

    /// Completion-only patch.
    pub fn complete() -> Self {
        Self {
            is_completed: Some(true),
            ..Self::default()
        }
    }
}

fn validate_fields(
    content: &str,
    word_count: u32,
    target_word_count: u32,
) -> Result<(), EntryValidationError> {
    if target_word_count == 0 {
        return Err(EntryValidationError::ZeroTarget);
    }
    let derived = count_words(content);
    if derived != word_count {
        return Err(EntryValidationError::WordCountMismatch {
            stored: word_count,
            derived,
        });
    }
    Ok(())
}
