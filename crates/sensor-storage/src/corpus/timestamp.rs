use chrono::{DateTime, TimeZone, Utc};

use sensor_core::errors::{SensorError, SensorResult};

/// Parses the corpus's `created_at` column. Accepts RFC 3339 (the documented
/// format) and falls back to a raw Unix timestamp in seconds, since corpus
/// exports commonly land in either shape.
pub fn parse_created_at(raw: &str) -> SensorResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(secs) = raw.parse::<i64>() {
        if let Some(dt) = Utc.timestamp_opt(secs, 0).single() {
            return Ok(dt);
        }
    }
    Err(SensorError::CorpusError {
        reason: format!("unparseable created_at value: {raw:?}"),
    })
}
