//! Command-line driver for the DailyInk journal.
//!
//! # Responsibility
//! - Map subcommands onto `JournalStore` operations over the SQLite journal.
//! - Render stats and the contribution calendar as plain text.

use chrono::Datelike;
use clap::{Parser, Subcommand};
use dailyink_core::db::open_db;
use dailyink_core::{
    init_logging, month_grid, Clock, EntryPhase, EntryRepository, IntensityLevel, JournalConfig,
    JournalStore, MonthGrid, RejectReason, SqliteEntryRepository, StoreOutcome, SystemClock,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Daily writing journal with a word-count goal.
#[derive(Parser, Debug)]
#[command(name = "dailyink", version, about, long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(short, long, global = true, env = "DAILYINK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show today's entry and progress toward the goal.
    Status,
    /// Start today's entry.
    Start {
        /// Word-count goal; defaults to the configured target.
        #[arg(short, long)]
        target: Option<u32>,
    },
    /// Replace today's text. Refused if it would remove words under goal.
    Write { text: String },
    /// Add text to the end of today's entry.
    Append { text: String },
    /// Lock today's entry now.
    Complete,
    /// Totals, streak and average words per entry.
    Stats,
    /// Contribution heat-map for one month.
    Calendar {
        #[arg(short, long)]
        year: Option<i32>,
        /// Month number, 1-12.
        #[arg(short, long)]
        month: Option<u32>,
    },
    /// All entries, newest first.
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("dailyink: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = JournalConfig::load(cli.config.as_deref()).map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let conn = open_db(&config.db_path)
        .map_err(|err| format!("cannot open `{}`: {err}", config.db_path.display()))?;
    let repo =
        SqliteEntryRepository::try_new(&conn, clock.clone()).map_err(|err| err.to_string())?;
    let mut store = JournalStore::with_config(repo, clock.clone(), &config);
    if let StoreOutcome::PersistenceFailed = store.fetch_entries() {
        return Err("failed to load entries".to_string());
    }

    match cli.command {
        Command::Status => print_status(&store),
        Command::Start { target } => {
            match store.create_entry(target) {
                StoreOutcome::Saved(entry) => println!(
                    "Started entry for {} (goal {} words).",
                    entry.date, entry.target_word_count
                ),
                StoreOutcome::AlreadyInProgress(_) => println!("Today's entry is already started."),
                other => return Err(describe_failure(&other)),
            }
            Ok(())
        }
        Command::Write { text } => {
            ensure_started(&mut store)?;
            let outcome = store.update_entry(&text);
            report_update(&store, outcome)
        }
        Command::Append { text } => {
            ensure_started(&mut store)?;
            let current = store
                .current_entry()
                .map(|entry| entry.content.clone())
                .unwrap_or_default();
            let combined = if current.trim().is_empty() {
                text
            } else {
                format!("{} {}", current.trim_end(), text)
            };
            let outcome = store.update_entry(&combined);
            report_update(&store, outcome)
        }
        Command::Complete => match store.complete_entry() {
            StoreOutcome::Saved(_) => {
                println!("Entry locked.");
                Ok(())
            }
            StoreOutcome::Unchanged => {
                println!("Entry was already locked.");
                Ok(())
            }
            other => Err(describe_failure(&other)),
        },
        Command::Stats => {
            let stats = store.stats();
            let insights = stats.insights();
            println!("Total words:   {}", stats.total_word_count);
            println!("Total entries: {}", stats.total_entries);
            println!("Streak:        {} days", stats.streak_days);
            match insights.average_words_per_entry {
                Some(average) => println!("Average:       {average} words per entry"),
                None => println!("Start writing to see your insights!"),
            }
            Ok(())
        }
        Command::Calendar { year, month } => {
            let today = clock.today();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let grid = month_grid(&store.stats().contributions, year, month, &config.thresholds)
                .map_err(|err| err.to_string())?;
            print_calendar(&grid, &config.thresholds.legend());
            Ok(())
        }
        Command::List => {
            if store.entries().is_empty() {
                println!("No entries yet.");
            }
            for entry in store.entries() {
                let mark = if entry.is_completed { " [done]" } else { "" };
                println!(
                    "{}  {:>5} / {} words{mark}",
                    entry.date, entry.word_count, entry.target_word_count
                );
            }
            Ok(())
        }
    }
}

fn ensure_started<R: EntryRepository>(store: &mut JournalStore<R>) -> Result<(), String> {
    match store.create_entry(None) {
        StoreOutcome::Saved(_) | StoreOutcome::AlreadyInProgress(_) => Ok(()),
        other => Err(describe_failure(&other)),
    }
}

fn report_update<R: EntryRepository>(
    store: &JournalStore<R>,
    outcome: StoreOutcome,
) -> Result<(), String> {
    match outcome {
        StoreOutcome::Saved(entry) if entry.is_completed => {
            println!(
                "Goal reached with {} words. Today's entry is now locked.",
                entry.word_count
            );
            Ok(())
        }
        StoreOutcome::Saved(_) | StoreOutcome::Unchanged => print_status(store),
        StoreOutcome::Rejected(RejectReason::Locked) => Err("today's entry is locked".to_string()),
        StoreOutcome::Rejected(RejectReason::WouldShrinkBelowGoal { current, proposed }) => {
            Err(format!(
                "words cannot be removed before the goal ({current} -> {proposed})"
            ))
        }
        other => Err(describe_failure(&other)),
    }
}

fn print_status<R: EntryRepository>(store: &JournalStore<R>) -> Result<(), String> {
    match store.current_entry() {
        Some(entry) => {
            let state = match EntryPhase::of(entry) {
                EntryPhase::Open => format!("{} words to go", entry.words_remaining()),
                EntryPhase::GoalReached => "goal reached".to_string(),
                EntryPhase::Locked => "locked".to_string(),
            };
            println!(
                "{}: {} / {} words ({state})",
                entry.date, entry.word_count, entry.target_word_count
            );
        }
        None => println!("No entry for today. Run `dailyink start` to begin."),
    }
    Ok(())
}

fn print_calendar(grid: &MonthGrid, legend: &[IntensityLevel]) {
    println!("{}-{:02}", grid.year, grid.month);
    println!("Su Mo Tu We Th Fr Sa");
    let mut line = "   ".repeat(grid.leading_blanks as usize);
    let mut column = grid.leading_blanks;
    for day in &grid.days {
        line.push_str(&format!("{}  ", glyph(day.level)));
        column += 1;
        if column == 7 {
            println!("{}", line.trim_end());
            line.clear();
            column = 0;
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    let legend: String = legend.iter().map(|level| glyph(*level)).collect();
    println!("Less {legend} More");
}

fn glyph(level: IntensityLevel) -> char {
    match level {
        IntensityLevel::None => '.',
        IntensityLevel::Low => '-',
        IntensityLevel::Medium => '+',
        IntensityLevel::High => '*',
        IntensityLevel::Max => '#',
    }
}

fn describe_failure(outcome: &StoreOutcome) -> String {
    match outcome {
        StoreOutcome::NoCurrentEntry => "no entry for today; run `dailyink start`".to_string(),
        StoreOutcome::PersistenceFailed => "the journal could not be saved".to_string(),
        StoreOutcome::Superseded => "a newer change replaced this one".to_string(),
        other => format!("unexpected result: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{glyph, Cli};
    use clap::CommandFactory;
    use dailyink_core::IntensityLevel;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn glyphs_are_distinct_per_level() {
        let levels = [
            IntensityLevel::None,
            IntensityLevel::Low,
            IntensityLevel::Medium,
            IntensityLevel::High,
            IntensityLevel::Max,
        ];
        let mut glyphs: Vec<char> = levels.iter().map(|level| glyph(*level)).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), levels.len());
    }
}
