use chrono::NaiveDate;
use dailyink_core::{
    month_grid, recompute, BucketThresholds, Clock, FixedClock, IntensityLevel, JournalStore,
    MemoryEntryRepository, StoreOutcome,
};
use std::sync::Arc;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn words(n: usize) -> String {
    vec!["ink"; n].join(" ")
}

#[test]
fn incremental_stats_match_full_recompute_across_days() {
    let clock = Arc::new(FixedClock::new(date(3, 1), 0));
    let repo = MemoryEntryRepository::new(clock.clone());
    let mut store = JournalStore::new(&repo, clock.clone());

    let plan = [(date(3, 1), 120), (date(3, 2), 40), (date(3, 3), 0), (date(3, 4), 600)];
    for (day, count) in plan {
        clock.set_today(day);
        store.create_entry(Some(500));
        store.update_entry(&words(count / 2));
        store.update_entry(&words(count));
        let today = clock.today();
        assert_eq!(store.stats(), recompute(store.entries(), today));
    }

    let stats = store.stats();
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.total_word_count, 760);
    // 3-3 has no words, so only 3-4 counts.
    assert_eq!(stats.streak_days, 1);
    assert_eq!(store.insights().average_words_per_entry, Some(190));

    let mut reloaded = JournalStore::new(&repo, clock.clone());
    reloaded.fetch_entries();
    assert_eq!(reloaded.stats(), stats);
}

#[test]
fn streak_counts_back_from_yesterday_when_today_is_empty() {
    let clock = Arc::new(FixedClock::new(date(5, 10), 0));
    let repo = MemoryEntryRepository::new(clock.clone());
    let mut store = JournalStore::new(&repo, clock.clone());

    for d in 7..=9 {
        clock.set_today(date(5, d));
        store.create_entry(Some(10));
        store.update_entry("a few words");
    }
    clock.set_today(date(5, 10));
    assert!(store.create_entry(Some(10)).is_saved());

    assert_eq!(store.stats().streak_days, 3);
    store.update_entry("today counts too");
    assert_eq!(store.stats().streak_days, 4);

    clock.set_today(date(5, 12));
    assert_eq!(store.stats().streak_days, 0);
}

#[test]
fn month_contributions_and_grid_follow_store_writes() {
    let clock = Arc::new(FixedClock::new(date(1, 31), 0));
    let repo = MemoryEntryRepository::new(clock.clone());
    let mut store = JournalStore::new(&repo, clock.clone());

    store.create_entry(Some(1_000));
    store.update_entry(&words(350));
    clock.set_today(date(2, 1));
    store.create_entry(Some(1_000));
    store.update_entry(&words(99));

    let january = store.get_contributions_by_month(1, 2025);
    assert_eq!(january.len(), 1);
    assert_eq!(january[0].word_count, 350);

    let grid = month_grid(
        &store.stats().contributions,
        2025,
        1,
        &BucketThresholds::default(),
    )
    .unwrap();
    assert_eq!(grid.days.len(), 31);
    assert_eq!(grid.days[30].level, IntensityLevel::High);
    assert_eq!(grid.days[0].level, IntensityLevel::None);

    let february = month_grid(
        &store.stats().contributions,
        2025,
        2,
        &BucketThresholds::default(),
    )
    .unwrap();
    assert_eq!(february.days.len(), 28);
    assert_eq!(february.days[0].level, IntensityLevel::Low);
}

#[test]
fn entries_serialize_with_external_field_names() {
    let clock = Arc::new(FixedClock::new(date(6, 1), 42));
    let repo = MemoryEntryRepository::new(clock.clone());
    let mut store = JournalStore::new(&repo, clock);
    let StoreOutcome::Saved(entry) = store.create_entry(Some(25)) else {
        panic!("create should save");
    };

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["date"], "2025-06-01");
    assert_eq!(value["wordCount"], 0);
    assert_eq!(value["targetWordCount"], 25);
    assert_eq!(value["isCompleted"], false);
    assert_eq!(value["lastModified"], 42);

    let stats = serde_json::to_value(store.stats()).unwrap();
    assert_eq!(stats["totalEntries"], 1);
    assert_eq!(stats["contributions"][0]["date"], "2025-06-01");
}
