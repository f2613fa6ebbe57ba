//! Unit lookup model.

use serde::Serialize;
use sqlx::FromRow;
use babycontrol_core::types::DbId;

/// A row from the seeded `units` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: DbId,
    pub unit_abbr: String,
    pub unit_name: String,
    /// Comma-separated activity tags, e.g. `bottle,medicine`.
    pub activity_types: String,
}

impl Unit {
    /// Whether this unit applies to the given activity tag.
    pub fn applies_to(&self, activity: &str) -> bool {
        self.activity_types
            .split(',')
            .any(|a| a.trim().eq_ignore_ascii_case(activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_to_matches_tags() {
        let unit = Unit {
            id: 1,
            unit_abbr: "ML".into(),
            unit_name: "Milliliters".into(),
            activity_types: "bottle, medicine".into(),
        };
        assert!(unit.applies_to("bottle"));
        assert!(unit.applies_to("MEDICINE"));
        assert!(!unit.applies_to("weight"));
    }
}
