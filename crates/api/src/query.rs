//! Shared query parameter types for API handlers.

use babycontrol_core::activity::{clamp_limit, validate_date_range};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::{DbId, Timestamp};
use babycontrol_db::models::log_filter::LogFilter;
use serde::Deserialize;

/// `?babyId=&startDate=&endDate=&limit=` accepted by every activity list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub baby_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub limit: Option<i64>,
}

impl LogQuery {
    /// Validate the window and build a filter scoped to `family_id`.
    pub fn into_filter(self, family_id: DbId) -> Result<LogFilter, CoreError> {
        validate_date_range(self.start_date, self.end_date)?;
        Ok(LogFilter {
            family_id,
            baby_id: self.baby_id,
            start: self.start_date,
            end: self.end_date,
            limit: clamp_limit(self.limit),
        })
    }
}

/// `?includeInactive=true` for lists with soft-deactivation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn filter_clamps_limit_and_scopes_family() {
        let query = LogQuery {
            baby_id: Some(3),
            limit: Some(10_000),
            ..Default::default()
        };
        let filter = query.into_filter(7).unwrap();
        assert_eq!(filter.family_id, 7);
        assert_eq!(filter.baby_id, Some(3));
        assert_eq!(filter.limit, 500);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let query = LogQuery {
            start_date: Some(now),
            end_date: Some(now - Duration::hours(1)),
            ..Default::default()
        };
        assert!(query.into_filter(1).is_err());
    }
}
