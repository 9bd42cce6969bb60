//! Daily retention tracking.
//!
//! Retention is reported at most once per local calendar day. Dates are
//! stored as ISO `YYYY-MM-DD` strings and compared as calendar dates, so
//! time-of-day and DST shifts never move a report into a different day.

use crate::store::{
    KeyValueStore, StoreError, FIRST_LOGIN_DATE_KEY, LAST_SENT_METRIC_DATE_KEY, RETENTION_DAY_KEY,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Retention figures for one report, encoded as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionResult {
    /// Days elapsed since the first login
    pub retention_day: String,
    /// Days elapsed since the previous report (0 on the first report)
    pub backfill_day: String,
}

/// A computed, not yet committed, retention report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPlan {
    pub today: NaiveDate,
    pub retention_day: i64,
    pub backfill_day: i64,
}

impl RetentionPlan {
    /// Wire form of this plan.
    pub fn result(&self) -> RetentionResult {
        RetentionResult {
            retention_day: self.retention_day.to_string(),
            backfill_day: self.backfill_day.to_string(),
        }
    }
}

/// The host's current local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date the way it is persisted.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Retention calculator over a key-value store.
pub struct RetentionTracker<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> RetentionTracker<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Decide what to report for `today` without recording the report.
    ///
    /// Returns `None` when retention was already reported today; that branch
    /// touches nothing. Otherwise the first-login date is bootstrapped to
    /// `today` if it is missing or unreadable.
    pub fn plan(&self, today: NaiveDate) -> Result<Option<RetentionPlan>, StoreError> {
        let last_sent = self
            .store
            .get(LAST_SENT_METRIC_DATE_KEY)?
            .and_then(|v| parse_date(&v));

        if last_sent == Some(today) {
            tracing::debug!(%today, "Retention already sent today");
            return Ok(None);
        }

        let first_login = match self.store.get(FIRST_LOGIN_DATE_KEY)?.and_then(|v| parse_date(&v)) {
            Some(date) => date,
            None => {
                self.store.set(FIRST_LOGIN_DATE_KEY, &format_date(today))?;
                tracing::debug!(%today, "Recorded first login date");
                today
            }
        };

        let previous_day = self
            .store
            .get(RETENTION_DAY_KEY)?
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        // Counter never goes backwards, even if the clock does
        let retention_day = days_between(first_login, today).max(previous_day);
        let backfill_day = last_sent.map_or(0, |date| days_between(date, today));

        Ok(Some(RetentionPlan {
            today,
            retention_day,
            backfill_day,
        }))
    }

    /// Record `plan` as reported.
    pub fn commit(&self, plan: &RetentionPlan) -> Result<(), StoreError> {
        self.store
            .set(LAST_SENT_METRIC_DATE_KEY, &format_date(plan.today))?;
        self.store
            .set(RETENTION_DAY_KEY, &plan.retention_day.to_string())?;
        Ok(())
    }

    /// Plan and immediately commit today's report.
    pub fn compute(&self, today: NaiveDate) -> Result<Option<RetentionResult>, StoreError> {
        match self.plan(today)? {
            Some(plan) => {
                self.commit(&plan)?;
                Ok(Some(plan.result()))
            }
            None => Ok(None),
        }
    }
}

/// Whole calendar days from `from` to `to`, clamped at zero.
fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(0)
}
