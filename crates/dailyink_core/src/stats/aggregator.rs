//! Totals, contributions and streak derivation.
//!
//! # Responsibility
//! - Full recompute of `Stats` from an entry slice.
//! - Incremental maintenance of the same numbers as entries change.
//!
//! # Invariants
//! - `StatsAggregator::from_entries(e).snapshot(d) == recompute(e, d)`, and
//!   stays equal under `record_created`/`apply_delta` mirroring store writes.
//! - Word-count deltas land on the entry's own date bucket, not on today.

use crate::model::entry::Entry;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-date aggregate word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub date: NaiveDate,
    pub word_count: u64,
}

/// Aggregate writing statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_word_count: u64,
    pub total_entries: u32,
    pub streak_days: u32,
    /// Ordered by date ascending.
    pub contributions: Vec<Contribution>,
}

/// Summary figures shown next to the raw totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// `None` until something has been written.
    pub average_words_per_entry: Option<u64>,
    pub streak_days: u32,
}

impl Stats {
    pub fn insights(&self) -> Insights {
        let average_words_per_entry = if self.total_word_count == 0 {
            None
        } else {
            let entries = u64::from(self.total_entries.max(1));
            Some((self.total_word_count * 2 + entries) / (entries * 2))
        };
        Insights {
            average_words_per_entry,
            streak_days: self.streak_days,
        }
    }

    /// Contributions whose date falls in `month` (1-12) of `year`.
    pub fn contributions_in_month(&self, month: u32, year: i32) -> Vec<Contribution> {
        self.contributions
            .iter()
            .filter(|c| c.date.month() == month && c.date.year() == year)
            .copied()
            .collect()
    }
}

/// Full-recompute strategy.
pub fn recompute(entries: &[Entry], today: NaiveDate) -> Stats {
    StatsAggregator::from_entries(entries).snapshot(today)
}

/// Consecutive active days ending today, or yesterday when today is still
/// empty. A day is active when its contribution is greater than zero.
pub fn streak_days(contributions: &BTreeMap<NaiveDate, u64>, today: NaiveDate) -> u32 {
    let is_active = |day: NaiveDate| contributions.get(&day).is_some_and(|words| *words > 0);

    let mut day = today;
    if !is_active(day) {
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => return 0,
        }
    }

    let mut streak = 0;
    while is_active(day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Incrementally maintained statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsAggregator {
    total_word_count: u64,
    total_entries: u32,
    contributions: BTreeMap<NaiveDate, u64>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut aggregator = Self::new();
        for entry in entries {
            aggregator.record_created(entry);
        }
        aggregator
    }

    /// Counts a newly persisted entry.
    pub fn record_created(&mut self, entry: &Entry) {
        let words = u64::from(entry.word_count);
        self.total_entries = self.total_entries.saturating_add(1);
        self.total_word_count += words;
        *self.contributions.entry(entry.date).or_insert(0) += words;
    }

    /// Applies `new - previous` for one entry to the totals and to `date`.
    pub fn apply_delta(&mut self, date: NaiveDate, previous: u32, new: u32) {
        let (previous, new) = (u64::from(previous), u64::from(new));
        let bucket = self.contributions.entry(date).or_insert(0);
        if new >= previous {
            let grow = new - previous;
            *bucket += grow;
            self.total_word_count += grow;
        } else {
            let shrink = previous - new;
            *bucket = bucket.saturating_sub(shrink);
            self.total_word_count = self.total_word_count.saturating_sub(shrink);
        }
    }

    pub fn total_word_count(&self) -> u64 {
        self.total_word_count
    }

    /// Materializes `Stats` with the streak evaluated against `today`.
    pub fn snapshot(&self, today: NaiveDate) -> Stats {
        Stats {
            total_word_count: self.total_word_count,
            total_entries: self.total_entries,
            streak_days: streak_days(&self.contributions, today),
            contributions: self
                .contributions
                .iter()
                .map(|(date, word_count)| Contribution {
                    date: *date,
                    word_count: *word_count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{recompute, streak_days, Contribution, Stats, StatsAggregator};
    use crate::model::entry::Entry;
    use crate::text::word_count::count_words;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(on: NaiveDate, content: &str) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            content: content.to_string(),
            date: on,
            word_count: count_words(content),
            target_word_count: 50,
            is_completed: false,
            last_modified: 0,
        }
    }

    #[test]
    fn three_consecutive_days_make_a_three_day_streak() {
        let today = date(2024, 4, 10);
        let map = BTreeMap::from([
            (date(2024, 4, 10), 5),
            (date(2024, 4, 9), 1),
            (date(2024, 4, 8), 300),
            (date(2024, 4, 6), 40),
        ]);
        assert_eq!(streak_days(&map, today), 3);
    }

    #[test]
    fn empty_today_counts_back_from_yesterday() {
        let today = date(2024, 4, 10);
        let map = BTreeMap::from([(date(2024, 4, 10), 0), (date(2024, 4, 9), 12), (date(2024, 4, 8), 3)]);
        assert_eq!(streak_days(&map, today), 2);
    }

    #[test]
    fn gap_before_yesterday_breaks_the_streak() {
        let today = date(2024, 4, 10);
        let map = BTreeMap::from([(date(2024, 4, 8), 12)]);
        assert_eq!(streak_days(&map, today), 0);
    }

    #[test]
    fn multiple_entries_on_one_day_share_a_bucket() {
        let day = date(2024, 2, 29);
        let entries = vec![entry(day, "one two"), entry(day, "three"), entry(date(2024, 3, 1), "")];
        let stats = recompute(&entries, date(2024, 3, 1));
        assert_eq!(stats.total_word_count, 3);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.contributions.len(), 2);
        assert_eq!(stats.contributions[0].word_count, 3);
        assert_eq!(stats.contributions[1].word_count, 0);
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn incremental_updates_match_full_recompute() {
        let today = date(2024, 7, 4);
        let mut entries = vec![entry(date(2024, 7, 2), "a b c"), entry(today, "")];
        let mut aggregator = StatsAggregator::from_entries(&entries);

        let back_dated = entry(date(2024, 7, 3), "x y");
        aggregator.record_created(&back_dated);
        entries.push(back_dated);

        let previous = entries[0].word_count;
        entries[0].content = "a".to_string();
        entries[0].word_count = 1;
        aggregator.apply_delta(entries[0].date, previous, 1);

        let previous = entries[1].word_count;
        entries[1].content = "now we write".to_string();
        entries[1].word_count = 3;
        aggregator.apply_delta(entries[1].date, previous, 3);

        assert_eq!(aggregator.snapshot(today), recompute(&entries, today));
        let july_2 = aggregator.snapshot(today).contributions_in_month(7, 2024);
        assert!(july_2.contains(&Contribution {
            date: date(2024, 7, 2),
            word_count: 1
        }));
    }

    #[test]
    fn repeated_identical_delta_does_not_double_count() {
        let day = date(2024, 1, 1);
        let mut aggregator = StatsAggregator::from_entries(&[entry(day, "")]);
        aggregator.apply_delta(day, 0, 4);
        aggregator.apply_delta(day, 4, 4);
        assert_eq!(aggregator.total_word_count(), 4);
        assert_eq!(
            aggregator.snapshot(day).contributions,
            vec![Contribution {
                date: day,
                word_count: 4
            }]
        );
    }

    #[test]
    fn insights_round_the_average() {
        let stats = Stats {
            total_word_count: 250,
            total_entries: 4,
            ..Stats::default()
        };
        assert_eq!(stats.insights().average_words_per_entry, Some(63));
        assert_eq!(Stats::default().insights().average_words_per_entry, None);
    }

    #[test]
    fn contributions_filter_by_month() {
        let entries = vec![
            entry(date(2024, 1, 31), "a"),
            entry(date(2024, 2, 1), "b c"),
            entry(date(2023, 2, 5), "d"),
        ];
        let stats = recompute(&entries, date(2024, 2, 2));
        let feb = stats.contributions_in_month(2, 2024);
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].word_count, 2);
    }
}
