//! Cross-activity timeline built from a `UNION ALL` over every log table.

use sqlx::PgPool;

use crate::models::log_filter::LogFilter;
use crate::models::timeline::TimelineEntry;

/// Each branch selects `(kind, id, baby_id, caretaker_id, time, summary)`
/// with the shared filter placeholders `$1..$4`.
const TIMELINE_SQL: &str = "
    SELECT * FROM (
        SELECT 'sleep' AS kind, id, baby_id, caretaker_id, start_time AS time,
               sleep_type || COALESCE(' (' || duration_minutes || ' min)', '') AS summary,
               family_id, deleted_at
          FROM sleep_logs
        UNION ALL
        SELECT 'feed', id, baby_id, caretaker_id, time,
               feed_type || COALESCE(' ' || amount || ' ' || unit_abbr, '')
                         || COALESCE(' ' || side, ''),
               family_id, deleted_at
          FROM feed_logs
        UNION ALL
        SELECT 'diaper', id, baby_id, caretaker_id, time,
               diaper_type || CASE WHEN blowout THEN ' (blowout)' ELSE '' END,
               family_id, deleted_at
          FROM diaper_logs
        UNION ALL
        SELECT 'bath', id, baby_id, caretaker_id, time,
               'Bath' || COALESCE(': ' || notes, ''),
               family_id, deleted_at
          FROM bath_logs
        UNION ALL
        SELECT 'milestone', id, baby_id, caretaker_id, date, category || ': ' || title,
               family_id, deleted_at
          FROM milestones
        UNION ALL
        SELECT 'note', id, baby_id, caretaker_id, time, content,
               family_id, deleted_at
          FROM notes
        UNION ALL
        SELECT 'measurement', id, baby_id, caretaker_id, date,
               measurement_type || ' ' || value || ' ' || unit_abbr,
               family_id, deleted_at
          FROM measurements
        UNION ALL
        SELECT 'medicine', ml.id, ml.baby_id, ml.caretaker_id, ml.time,
               m.name || ' ' || ml.dose_amount || COALESCE(' ' || ml.unit_abbr, ''),
               ml.family_id, ml.deleted_at
          FROM medicine_logs ml
          JOIN medicines m ON m.id = ml.medicine_id
    ) entries
    WHERE family_id = $1 AND deleted_at IS NULL
      AND ($2::BIGINT IS NULL OR baby_id = $2)
      AND ($3::TIMESTAMPTZ IS NULL OR time >= $3)
      AND ($4::TIMESTAMPTZ IS NULL OR time <= $4)
    ORDER BY time DESC
    LIMIT $5";

pub struct TimelineRepo;

impl TimelineRepo {
    /// Merged, newest-first activity entries for a family.
    pub async fn list(pool: &PgPool, filter: &LogFilter) -> Result<Vec<TimelineEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimelineEntry>(TIMELINE_SQL)
            .bind(filter.family_id)
            .bind(filter.baby_id)
            .bind(filter.start)
            .bind(filter.end)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }
}
