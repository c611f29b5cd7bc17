//! Projection of a wall-clock time into every other configured zone.

use chrono::{LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::{CanonicalTime, TimeZoneRegistry};
use crate::error::{Error, Result};

/// Convert `time` (today's date in the source zone) into every other
/// registry zone, in registry order, excluding the source label.
///
/// The source zone's calendar date is always used; a target whose local
/// date differs still reports its wall-clock hour/minute for that instant.
pub fn convert(
    time: CanonicalTime,
    source_label: &str,
    registry: &TimeZoneRegistry,
) -> Result<Vec<(String, CanonicalTime)>> {
    let source_tz = registry
        .resolve(source_label)
        .ok_or_else(|| Error::UnknownLocation {
            label: source_label.to_string(),
        })?;

    let today = Utc::now().with_timezone(&source_tz).date_naive();
    let instant = anchor(today, time, source_tz, source_label)?;

    let mut results = Vec::with_capacity(registry.len().saturating_sub(1));
    for (label, tz) in registry.iter() {
        if label == source_label {
            continue;
        }
        let local = instant.with_timezone(&tz);
        results.push((label.to_string(), CanonicalTime::from(local.time())));
    }

    Ok(results)
}

/// Current wall-clock time in the labelled zone.
pub fn current_time_in(label: &str, registry: &TimeZoneRegistry) -> Result<CanonicalTime> {
    let tz = registry.resolve(label).ok_or_else(|| Error::UnknownLocation {
        label: label.to_string(),
    })?;
    let now = Utc::now().with_timezone(&tz);
    Ok(CanonicalTime::from(now.time()))
}

/// Combine a calendar date in `tz` with the supplied hour/minute.
fn anchor(
    date: NaiveDate,
    time: CanonicalTime,
    tz: Tz,
    label: &str,
) -> Result<chrono::DateTime<Tz>> {
    let naive = date.and_time(time.to_naive());

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        // DST fall-back repeats an hour; take the earlier occurrence.
        LocalResult::Ambiguous(dt, _) => Ok(dt),
        // DST spring-forward skips the hour entirely. The input is a valid
        // time that happens not to occur on this date, which is a different
        // situation from a malformed time string.
        LocalResult::None => Err(Error::NonexistentLocalTime {
            label: label.to_string(),
            time: format!("{:02}:{:02}", time.hour, time.minute),
        }),
    }
}
