//! Time window of a sync pass.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

pub const DEFAULT_PAST_DAYS: i64 = 5;
pub const DEFAULT_FUTURE_DAYS: i64 = 10;

/// `[from, to)` bounds, both at midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Default for SyncWindow {
    /// Default window: 5 days back, 10 days forward from today
    fn default() -> Self {
        SyncWindow::current(DEFAULT_PAST_DAYS, DEFAULT_FUTURE_DAYS)
    }
}

impl SyncWindow {
    /// Window around the current UTC date. Evaluated on every call so that
    /// long-lived processes don't keep a stale window.
    pub fn current(past_days: i64, future_days: i64) -> Self {
        SyncWindow::around(Utc::now().date_naive(), past_days, future_days)
    }

    pub fn around(today: NaiveDate, past_days: i64, future_days: i64) -> Self {
        SyncWindow {
            from: midnight(today - Duration::days(past_days)),
            to: midnight(today + Duration::days(future_days)),
        }
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
