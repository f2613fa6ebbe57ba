//! Activity vocabulary and validation helpers.
//!
//! Discriminator columns are stored as uppercase TEXT guarded by CHECK
//! constraints; the lists here must stay in sync with those constraints.

use chrono::NaiveTime;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Discriminator values
// ---------------------------------------------------------------------------

pub const SLEEP_TYPES: &[&str] = &["NAP", "NIGHT_SLEEP"];
pub const SLEEP_QUALITIES: &[&str] = &["POOR", "FAIR", "GOOD", "EXCELLENT"];

pub const FEED_TYPE_BREAST: &str = "BREAST";
pub const FEED_TYPE_BOTTLE: &str = "BOTTLE";
pub const FEED_TYPE_SOLIDS: &str = "SOLIDS";
pub const FEED_TYPES: &[&str] = &[FEED_TYPE_BREAST, FEED_TYPE_BOTTLE, FEED_TYPE_SOLIDS];
pub const BREAST_SIDES: &[&str] = &["LEFT", "RIGHT"];

pub const DIAPER_TYPES: &[&str] = &["WET", "DIRTY", "BOTH"];

pub const MILESTONE_CATEGORIES: &[&str] = &["MOTOR", "COGNITIVE", "SOCIAL", "LANGUAGE", "CUSTOM"];

pub const MEASUREMENT_TYPES: &[&str] = &["HEIGHT", "WEIGHT", "HEAD_CIRCUMFERENCE", "TEMPERATURE"];

pub const GENDERS: &[&str] = &["MALE", "FEMALE"];

pub const AUTH_TYPE_SYSTEM: &str = "SYSTEM";
pub const AUTH_TYPE_CARETAKER: &str = "CARETAKER";
pub const AUTH_TYPES: &[&str] = &[AUTH_TYPE_SYSTEM, AUTH_TYPE_CARETAKER];

/// Maximum length of free-text fields (notes, descriptions).
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Default number of rows returned by activity list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 100;
/// Upper bound on rows returned by activity list endpoints.
pub const MAX_LIST_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that `value` is one of `valid`.
pub fn validate_one_of(value: &str, valid: &[&str], label: &str) -> Result<(), CoreError> {
    if valid.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {label} '{value}'. Must be one of: {}",
            valid.join(", ")
        )))
    }
}

/// Same as [`validate_one_of`] but accepts `None`.
pub fn validate_optional_one_of(
    value: Option<&str>,
    valid: &[&str],
    label: &str,
) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_one_of(v, valid, label),
        None => Ok(()),
    }
}

/// Validate a `HH:MM` time-of-day string (warning thresholds, dose spacing).
pub fn validate_hhmm(value: &str, label: &str) -> Result<(), CoreError> {
    let well_formed = value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{label} must be in HH:MM format"
        )))
    }
}

/// Validate an optional free-text field does not exceed [`MAX_TEXT_LENGTH`].
pub fn validate_text_length(value: Option<&str>, label: &str) -> Result<(), CoreError> {
    match value {
        Some(v) if v.chars().count() > MAX_TEXT_LENGTH => Err(CoreError::Validation(format!(
            "{label} must be at most {MAX_TEXT_LENGTH} characters"
        ))),
        _ => Ok(()),
    }
}

/// Validate that a required text field is not blank.
pub fn validate_required(value: &str, label: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("{label} is required")))
    } else {
        Ok(())
    }
}

/// Validate that a numeric amount is not negative.
pub fn validate_non_negative(value: Option<f64>, label: &str) -> Result<(), CoreError> {
    match value {
        Some(v) if v < 0.0 || !v.is_finite() => Err(CoreError::Validation(format!(
            "{label} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

/// Validate that `start` is not after `end` when both are present.
pub fn validate_date_range(
    start: Option<Timestamp>,
    end: Option<Timestamp>,
) -> Result<(), CoreError> {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(CoreError::Validation(
                "Start date must be before end date".into(),
            ));
        }
    }
    Ok(())
}

/// Minutes between sleep start and end; `None` while the sleep is ongoing.
pub fn sleep_duration_minutes(
    start: Timestamp,
    end: Option<Timestamp>,
) -> Result<Option<i32>, CoreError> {
    let Some(end) = end else {
        return Ok(None);
    };
    if end < start {
        return Err(CoreError::Validation(
            "Sleep end time must be after start time".into(),
        ));
    }
    let minutes = (end - start).num_minutes();
    i32::try_from(minutes)
        .map(Some)
        .map_err(|_| CoreError::Validation("Sleep duration is too long".into()))
}

/// Clamp a user-supplied list limit into `1..=MAX_LIST_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Feed-specific cross-field rules.
///
/// Only breast feeds may carry a side.
pub fn validate_feed(
    feed_type: &str,
    side: Option<&str>,
    amount: Option<f64>,
) -> Result<(), CoreError> {
    validate_one_of(feed_type, FEED_TYPES, "feed type")?;
    validate_optional_one_of(side, BREAST_SIDES, "breast side")?;
    validate_non_negative(amount, "Amount")?;
    if side.is_some() && feed_type != FEED_TYPE_BREAST {
        return Err(CoreError::Validation(
            "Side is only valid for breast feeds".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn one_of_lists_valid_values() {
        let err = validate_one_of("NAPPING", SLEEP_TYPES, "sleep type").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("NAP, NIGHT_SLEEP"));
        assert!(validate_one_of("NAP", SLEEP_TYPES, "sleep type").is_ok());
        assert!(validate_optional_one_of(None, GENDERS, "gender").is_ok());
    }

    #[test]
    fn hhmm_format() {
        assert!(validate_hhmm("02:30", "Feed warning time").is_ok());
        assert!(validate_hhmm("23:59", "Feed warning time").is_ok());
        assert!(validate_hhmm("2:30", "Feed warning time").is_err());
        assert!(validate_hhmm("24:00", "Feed warning time").is_err());
        assert!(validate_hhmm("ab:cd", "Feed warning time").is_err());
    }

    #[test]
    fn sleep_duration() {
        let start = Utc::now();
        assert_eq!(sleep_duration_minutes(start, None).unwrap(), None);
        assert_eq!(
            sleep_duration_minutes(start, Some(start + Duration::minutes(95))).unwrap(),
            Some(95)
        );
        assert!(sleep_duration_minutes(start, Some(start - Duration::minutes(1))).is_err());
    }

    #[test]
    fn date_range() {
        let now = Utc::now();
        assert!(validate_date_range(Some(now), Some(now + Duration::days(1))).is_ok());
        assert!(validate_date_range(Some(now), None).is_ok());
        assert!(validate_date_range(Some(now + Duration::days(1)), Some(now)).is_err());
    }

    #[test]
    fn feed_rules() {
        assert!(validate_feed("BREAST", Some("LEFT"), None).is_ok());
        assert!(validate_feed("BOTTLE", None, Some(120.0)).is_ok());
        assert!(validate_feed("BOTTLE", Some("LEFT"), None).is_err());
        assert!(validate_feed("BOTTLE", None, Some(-1.0)).is_err());
        assert!(validate_feed("JUICE", None, None).is_err());
    }

    #[test]
    fn limit_clamping() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIST_LIMIT);
    }

    #[test]
    fn text_rules() {
        assert!(validate_required("  ", "Title").is_err());
        assert!(validate_required("First smile", "Title").is_ok());
        assert!(validate_text_length(Some(&"x".repeat(MAX_TEXT_LENGTH + 1)), "Notes").is_err());
        assert!(validate_text_length(None, "Notes").is_ok());
    }
}
