//! Shared filter for activity log listings.

use babycontrol_core::types::{DbId, Timestamp};

/// Filter applied to every activity list query.
///
/// `family_id` is always set by the handler from the caller's identity;
/// the remaining fields come from query parameters.
#[derive(Debug, Clone)]
pub struct LogFilter {
    pub family_id: DbId,
    pub baby_id: Option<DbId>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub limit: i64,
}
