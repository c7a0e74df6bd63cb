//! Contribution heat-map bucketing and month grids.
//!
//! # Responsibility
//! - Map per-day word counts onto discrete intensity levels through one
//!   configurable threshold table.
//! - Lay out a calendar month with a level for every day.
//!
//! # Invariants
//! - Threshold tables start at zero and are strictly increasing, so every
//!   count maps to exactly one level.
//! - A month grid covers every date of the month, with or without data.

use crate::stats::aggregator::Contribution;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Heat-map intensity for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityLevel {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl IntensityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Max => "max",
        }
    }
}

impl FromStr for IntensityLevel {
    type Err = HeatmapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "max" => Ok(Self::Max),
            other => Err(HeatmapError::UnknownLevel(other.to_string())),
        }
    }
}

/// One row of the threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub min_inclusive: u64,
    pub level: IntensityLevel,
}

impl Threshold {
    pub const fn new(min_inclusive: u64, level: IntensityLevel) -> Self {
        Self {
            min_inclusive,
            level,
        }
    }
}

const DEFAULT_THRESHOLDS: [Threshold; 5] = [
    Threshold::new(0, IntensityLevel::None),
    Threshold::new(1, IntensityLevel::Low),
    Threshold::new(100, IntensityLevel::Medium),
    Threshold::new(300, IntensityLevel::High),
    Threshold::new(500, IntensityLevel::Max),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeatmapError {
    EmptyThresholds,
    FirstThresholdNotZero(u64),
    UnorderedThresholds { previous: u64, next: u64 },
    UnknownLevel(String),
    InvalidMonth { year: i32, month: u32 },
}

impl Display for HeatmapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyThresholds => write!(f, "threshold table cannot be empty"),
            Self::FirstThresholdNotZero(min) => {
                write!(f, "first threshold must start at 0, got {min}")
            }
            Self::UnorderedThresholds { previous, next } => write!(
                f,
                "thresholds must be strictly increasing: {next} follows {previous}"
            ),
            Self::UnknownLevel(value) => write!(
                f,
                "unknown intensity level `{value}`; expected none|low|medium|high|max"
            ),
            Self::InvalidMonth { year, month } => write!(f, "invalid month {year}-{month}"),
        }
    }
}

impl Error for HeatmapError {}

/// Validated, ordered `(min_inclusive, level)` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Threshold>")]
pub struct BucketThresholds {
    rows: Vec<Threshold>,
}

impl BucketThresholds {
    pub fn new(rows: Vec<Threshold>) -> Result<Self, HeatmapError> {
        let first = rows.first().ok_or(HeatmapError::EmptyThresholds)?;
        if first.min_inclusive != 0 {
            return Err(HeatmapError::FirstThresholdNotZero(first.min_inclusive));
        }
        for pair in rows.windows(2) {
            if pair[1].min_inclusive <= pair[0].min_inclusive {
                return Err(HeatmapError::UnorderedThresholds {
                    previous: pair[0].min_inclusive,
                    next: pair[1].min_inclusive,
                });
            }
        }
        Ok(Self { rows })
    }

    /// Level of the last row whose minimum does not exceed `word_count`.
    pub fn bucket(&self, word_count: u64) -> IntensityLevel {
        self.rows
            .iter()
            .take_while(|row| row.min_inclusive <= word_count)
            .last()
            .map_or(IntensityLevel::None, |row| row.level)
    }

    /// Levels from least to most intense, for rendering a legend.
    pub fn legend(&self) -> Vec<IntensityLevel> {
        self.rows.iter().map(|row| row.level).collect()
    }
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            rows: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl TryFrom<Vec<Threshold>> for BucketThresholds {
    type Error = HeatmapError;

    fn try_from(value: Vec<Threshold>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Buckets `word_count` with the default table.
pub fn bucket(word_count: u64) -> IntensityLevel {
    BucketThresholds::default().bucket(word_count)
}

/// One calendar day in a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    /// `None` when nothing was recorded for the day.
    pub word_count: Option<u64>,
    pub level: IntensityLevel,
}

/// Calendar month laid out for a Sunday-first week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st (0 when the month starts on Sunday).
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

/// Builds the grid for `month` (1-12) of `year`.
pub fn month_grid(
    contributions: &[Contribution],
    year: i32,
    month: u32,
    thresholds: &BucketThresholds,
) -> Result<MonthGrid, HeatmapError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(HeatmapError::InvalidMonth { year, month })?;
    let by_date: HashMap<NaiveDate, u64> = contributions
        .iter()
        .map(|c| (c.date, c.word_count))
        .collect();

    let days = first
        .iter_days()
        .take_while(|day| day.month() == month)
        .map(|date| {
            let word_count = by_date.get(&date).copied();
            DayCell {
                date,
                word_count,
                level: thresholds.bucket(word_count.unwrap_or(0)),
            }
        })
        .collect();

    Ok(MonthGrid {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}
