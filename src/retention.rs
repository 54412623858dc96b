use chrono::{DateTime, Duration, Utc};

pub const RETENTION_DAYS: i64 = 7;

#[derive(Debug, PartialEq)]
pub struct RetentionWindow {
    pub cutoff: DateTime<Utc>,
}

impl From<DateTime<Utc>> for RetentionWindow {
    fn from(now: DateTime<Utc>) -> Self {
        RetentionWindow {
            cutoff: now - Duration::days(RETENTION_DAYS),
        }
    }
}

impl RetentionWindow {
    /// Only strictly older snapshots expire; one taken exactly at the cutoff is kept.
    pub fn is_expired(&self, start_time: &DateTime<Utc>) -> bool {
        *start_time < self.cutoff
    }
}
