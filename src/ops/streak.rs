//! Current and longest completion streaks, derived from completion records.
//!
//! Nothing here is cached or persisted. Both scans are bounded to
//! [`STREAK_WINDOW_DAYS`] so a lookup always terminates: a habit done every
//! day for more than a year reports a current streak of at most 365.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::io::store::{Store, StoreError};

/// Lookback window for both streak scans, in days
pub const STREAK_WINDOW_DAYS: i64 = 365;

/// Anything that can answer "was this habit done on this date?"
pub trait CompletionSource {
    type Error;

    fn is_completed(&self, habit_id: &str, date: NaiveDate) -> Result<bool, Self::Error>;
}

impl CompletionSource for Store {
    type Error = StoreError;

    fn is_completed(&self, habit_id: &str, date: NaiveDate) -> Result<bool, StoreError> {
        Store::is_completed(self, habit_id, date)
    }
}

/// One habit's completed dates, preloaded with a single range scan.
/// Renderers use this to avoid one query per day.
#[derive(Debug, Clone, Default)]
pub struct CompletionHistory {
    habit_id: String,
    dates: BTreeSet<NaiveDate>,
}

impl CompletionHistory {
    /// Load the full streak window ending at `today`
    pub fn load(store: &Store, habit_id: &str, today: NaiveDate) -> Result<Self, StoreError> {
        let from = today - Duration::days(STREAK_WINDOW_DAYS);
        let dates = store.completed_dates(habit_id, from, today)?;
        Ok(CompletionHistory {
            habit_id: habit_id.to_string(),
            dates,
        })
    }

    pub fn from_dates(habit_id: &str, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        CompletionHistory {
            habit_id: habit_id.to_string(),
            dates: dates.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

impl CompletionSource for CompletionHistory {
    type Error = std::convert::Infallible;

    fn is_completed(&self, habit_id: &str, date: NaiveDate) -> Result<bool, Self::Error> {
        Ok(habit_id == self.habit_id && self.dates.contains(&date))
    }
}

/// Consecutive completed days walking back from `today` (inclusive).
/// Zero if `today` itself is not completed.
pub fn current_streak<S: CompletionSource>(
    source: &S,
    habit_id: &str,
    today: NaiveDate,
) -> Result<u32, S::Error> {
    let mut streak = 0;
    for back in 0..STREAK_WINDOW_DAYS {
        let date = today - Duration::days(back);
        if source.is_completed(habit_id, date)? {
            streak += 1;
        } else {
            break;
        }
    }
    Ok(streak)
}

/// Best run of consecutive completed days in `today - 365 ..= today`.
pub fn longest_streak<S: CompletionSource>(
    source: &S,
    habit_id: &str,
    today: NaiveDate,
) -> Result<u32, S::Error> {
    let mut longest = 0;
    let mut run = 0;
    for back in (0..=STREAK_WINDOW_DAYS).rev() {
        let date = today - Duration::days(back);
        if source.is_completed(habit_id, date)? {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    Ok(longest)
}

/// Current and longest streak together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

pub fn streaks<S: CompletionSource>(
    source: &S,
    habit_id: &str,
    today: NaiveDate,
) -> Result<Streaks, S::Error> {
    Ok(Streaks {
        current: current_streak(source, habit_id, today)?,
        longest: longest_streak(source, habit_id, today)?,
    })
}
