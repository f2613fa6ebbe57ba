//! Merged activity timeline entry.

use serde::Serialize;
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// One row of the cross-activity timeline.
///
/// `kind` names the source table (`sleep`, `feed`, `diaper`, ...) and
/// `summary` is a short human-readable description built in SQL.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub kind: String,
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub time: Timestamp,
    pub summary: String,
}
