//! Fixed seven-day windows used by the weekly listing.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Number of calendar days covered by a window.
pub const WEEK_DAYS: u64 = 7;

/// Inclusive `[start, end]` range of seven calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// The window ending on `end` (`[end - 6, end]`).
    pub fn ending_at(end: NaiveDate) -> ResultEngine<Self> {
        let start = end
            .checked_sub_days(Days::new(WEEK_DAYS - 1))
            .ok_or_else(|| EngineError::InvalidDate(format!("no week ends on {end}")))?;
        Ok(Self { start, end })
    }

    /// Window `offset` weeks back from `today`.
    ///
    /// Offset 0 is `[today - 6, today]`, offset N is
    /// `[today - 7N - 6, today - 7N]`.
    pub fn for_offset(today: NaiveDate, offset: u32) -> ResultEngine<Self> {
        let end = today
            .checked_sub_days(Days::new(WEEK_DAYS * u64::from(offset)))
            .ok_or_else(|| {
                EngineError::InvalidDate(format!("week offset {offset} from {today}"))
            })?;
        Self::ending_at(end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The window directly before this one.
    pub fn previous(&self) -> ResultEngine<Self> {
        let end = self
            .start
            .pred_opt()
            .ok_or_else(|| EngineError::InvalidDate(format!("no day before {}", self.start)))?;
        Self::ending_at(end)
    }
}
