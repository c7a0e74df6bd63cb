//! Word-count gated edit lock.
//!
//! # Responsibility
//! - Evaluate proposed content against the entry lifecycle
//!   (open -> goal reached -> locked).
//! - Pre-filter delete/cut/paste events that act on a live selection.
//!
//! # Invariants
//! - `evaluate_edit` never mutates the entry; the caller applies the result.
//! - The completion flag in `AcceptedEdit` is set by the same decision that
//!   accepts the content, so both land in one write.
//! - Pre-filters never consult the resulting word count; they only look at
//!   the entry's current count and the selection.
//!
//! # Notes
//! Shrinking is allowed once `word_count >= target_word_count` even if the
//! completion flag has not been recorded yet. Completion is recorded by the
//! edit that crosses the goal, so this window only exists for entries whose
//! completion write failed or whose target was reached by other means.

use crate::model::entry::Entry;
use crate::text::word_count::count_words;

/// Lifecycle position of an entry as seen by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPhase {
    /// Under goal: content may only grow.
    Open,
    /// At or over goal without a recorded completion.
    GoalReached,
    /// Completed: read-only.
    Locked,
}

impl EntryPhase {
    pub fn of(entry: &Entry) -> Self {
        if entry.is_completed {
            Self::Locked
        } else if entry.goal_reached() {
            Self::GoalReached
        } else {
            Self::Open
        }
    }
}

/// Why an edit was refused. Refusals are policy, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Locked,
    WouldShrinkBelowGoal { current: u32, proposed: u32 },
}

/// Content change approved by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedEdit {
    pub content: String,
    pub word_count: u32,
    /// The edit reaches the goal and must lock the entry.
    pub completes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditDecision {
    Accepted(AcceptedEdit),
    Rejected(RejectReason),
}

/// Applies the asymmetric edit rule to `new_content`.
pub fn evaluate_edit(entry: &Entry, new_content: &str) -> EditDecision {
    if entry.is_completed {
        return EditDecision::Rejected(RejectReason::Locked);
    }

    let current = entry.word_count;
    let proposed = count_words(new_content);
    if proposed < current && current < entry.target_word_count {
        return EditDecision::Rejected(RejectReason::WouldShrinkBelowGoal { current, proposed });
    }

    EditDecision::Accepted(AcceptedEdit {
        content: new_content.to_string(),
        word_count: proposed,
        completes: proposed >= entry.target_word_count,
    })
}

/// Half-open `[start, end)` range in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Builds a selection, swapping reversed endpoints.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            start: anchor.min(head),
            end: anchor.max(head),
        }
    }

    /// Collapsed selection (plain cursor) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn clamped(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// Discrete editor input that may act on a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent<'a> {
    /// Backspace or Delete key.
    Delete { selection: Selection },
    Cut { selection: Selection },
    Paste { selection: Selection, text: &'a str },
}

impl InputEvent<'_> {
    fn selection(&self) -> Selection {
        match self {
            Self::Delete { selection } | Self::Cut { selection } => *selection,
            Self::Paste { selection, .. } => *selection,
        }
    }
}

/// What the editor should do with an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputVerdict {
    /// Let the native edit happen; the result still goes through `evaluate_edit`.
    PassThrough,
    /// Swallow the event.
    Block,
    /// Use this content instead of the native result and move the cursor.
    Replace { content: String, cursor: usize },
}

/// Pre-filters an input event against the entry and the editor's `content`.
pub fn prefilter_input(entry: &Entry, content: &str, event: &InputEvent<'_>) -> InputVerdict {
    if entry.is_completed {
        return InputVerdict::Block;
    }
    if entry.goal_reached() {
        return InputVerdict::PassThrough;
    }

    let selection = event.selection().clamped(content.chars().count());
    if selection.is_empty() {
        return InputVerdict::PassThrough;
    }

    match event {
        InputEvent::Delete { .. } | InputEvent::Cut { .. } => InputVerdict::Block,
        InputEvent::Paste { text, .. } => {
            let at = byte_offset(content, selection.start);
            let mut rewritten = String::with_capacity(content.len() + text.len());
            rewritten.push_str(&content[..at]);
            rewritten.push_str(text);
            rewritten.push_str(&content[at..]);
            InputVerdict::Replace {
                content: rewritten,
                cursor: selection.start + text.chars().count(),
            }
        }
    }
}

fn byte_offset(content: &str, char_offset: usize) -> usize {
    content
        .char_indices()
        .nth(char_offset)
        .map_or(content.len(), |(index, _)| index)
}
