use chrono::{Days, Local, NaiveDate};

/// A simple clock abstraction for deterministic "today" in services and tests.
///
/// The engines work on calendar days; the clock is only consulted by callers
/// that need a default `as_of` day.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(NaiveDate),
}

impl Clock {
    /// Returns a clock that follows the system's local calendar day.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock pinned to the given day.
    #[must_use]
    pub fn fixed(day: NaiveDate) -> Self {
        Self::Fixed(day)
    }

    /// Returns the current calendar day according to the clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::Default => Local::now().date_naive(),
            Clock::Fixed(day) => *day,
        }
    }
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// First day of an inclusive window of `len_days` days ending at `as_of`.
#[must_use]
pub fn window_start(as_of: NaiveDate, len_days: u64) -> NaiveDate {
    as_of
        .checked_sub_days(Days::new(len_days.saturating_sub(1)))
        .unwrap_or(NaiveDate::MIN)
}

/// Deterministic day for tests and examples (2023-11-14).
///
/// # Panics
///
/// Panics if the fixed date cannot be represented.
#[must_use]
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, 14).expect("fixed test date should be valid")
}

/// Returns a `Clock` fixed at the deterministic test day.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_today())
}
