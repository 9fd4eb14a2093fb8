use time::Duration;

use crate::error::{Result, StatsError};

/// Formats the pace for covering `miles` in `duration` as minutes per mile,
/// "MM:SS.s". The pace is multiplied by `vanity_factor` first (1.0 for the
/// truth).
///
/// `miles` must be positive; callers are expected to check before getting
/// here.
pub fn calc_min_per_mile(duration: Duration, miles: f64, vanity_factor: f64) -> String {
    debug_assert!(miles > 0.0, "pace requested for a distance of {miles} miles");

    let minutes_per_mile = (duration.as_seconds_f64() / miles) / 60.0 * vanity_factor;

    // Round to tenths of a second before splitting so that 9:59.97 comes out
    // as 10:00.0 rather than 09:60.0.
    let tenths = (minutes_per_mile * 600.0).round() as i64;
    let minutes = tenths / 600;
    let seconds = (tenths % 600) as f64 / 10.0;

    format!("{:02}:{:04.1}", minutes, seconds)
}

/// Paces are only meaningful when scaled by a finite, positive factor.
pub(crate) fn check_vanity_factor(vanity_factor: f64) -> Result<()> {
    if !vanity_factor.is_finite() || vanity_factor <= 0.0 {
        return Err(StatsError::precondition(format!(
            "vanity factor must be a positive number, got {vanity_factor}"
        )));
    }

    Ok(())
}

/// Formats a duration as "H:MM:SS", with a leading '-' if it is negative.
pub fn format_duration(duration: Duration) -> String {
    let sign = if duration.is_negative() { "-" } else { "" };
    let total = duration.whole_seconds().unsigned_abs();

    format!(
        "{sign}{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
