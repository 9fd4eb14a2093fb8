//! The headline statistics for a track. These are the functions a caller
//! normally wants; they are built on the extraction functions in the other
//! modules.

use log::{info, warn};
use logging_timer::time;
use time::{Duration, OffsetDateTime};

use crate::{
    config::StatsConfig,
    error::{Result, StatsError},
    formatting::{calc_min_per_mile, check_vanity_factor, format_duration},
    model::{GpsRecord, SpeedMetrics, SpeedSeries, Track, TrackStatistics},
    speed::{extract_distance_and_speed, max, mean, metres_to_miles},
    split::report_splits,
    timestamp::{extract_date_time, format_timestamp},
};

/// Returns the time between the first and last fixes of the track.
///
/// Records at either end whose timestamp does not parse are passed over,
/// so the result runs from the first to the last *usable* timestamp. If the
/// track runs backwards in time the result is negative.
pub fn report_timing_stats(track: &Track) -> Result<Duration> {
    if track.is_empty() {
        return Err(StatsError::precondition(
            "cannot calculate the duration of an empty track",
        ));
    }

    info!("Track has {} records", track.len());

    let (first_idx, start) = first_timestamp(track.iter().enumerate()).ok_or_else(|| {
        StatsError::precondition("no record in the track has a usable timestamp")
    })?;

    // There is at least one good timestamp, so this will find one too.
    let (last_idx, end) =
        first_timestamp(track.iter().enumerate().rev()).unwrap_or((first_idx, start));

    let skipped = first_idx + (track.last_valid_idx() - last_idx);
    if skipped > 0 {
        warn!("Ignored {skipped} records at the ends of the track with unusable timestamps");
    }

    let delta = end - start;
    info!("Start Time {}", format_timestamp(start));
    info!("End Time   {}", format_timestamp(end));
    info!("Delta = {}", format_duration(delta));

    Ok(delta)
}

fn first_timestamp<'a, I>(mut records: I) -> Option<(usize, OffsetDateTime)>
where
    I: Iterator<Item = (usize, &'a GpsRecord)>,
{
    records.find_map(|(idx, record)| extract_date_time(record).ok().map(|ts| (idx, ts)))
}

/// Works out the max and mean of each speed series, the total distance,
/// and the average pace over the whole series.
pub fn calc_speed_metrics(series: &SpeedSeries, vanity_factor: f64) -> Result<SpeedMetrics> {
    if series.distance.is_empty() {
        return Err(StatsError::precondition(
            "cannot calculate speed metrics for an empty series",
        ));
    }

    let n = series.distance.len();
    let lengths = [
        series.indices.len(),
        series.speed_knots.len(),
        series.speed_mps.len(),
        series.speed_mps_computed.len(),
        series.speed_mph.len(),
        series.timestamps.len(),
    ];
    if lengths.iter().any(|&len| len != n) {
        return Err(StatsError::precondition(format!(
            "speed series vectors have mismatched lengths: {n} distances, {lengths:?} others"
        )));
    }

    check_vanity_factor(vanity_factor)?;

    let total_metres: f64 = series.distance.iter().sum();
    let total_distance_miles = metres_to_miles(total_metres);
    let elapsed = series.timestamps[series.timestamps.len() - 1] - series.timestamps[0];

    let average_pace = if total_distance_miles > 0.0 && !elapsed.is_negative() {
        Some(calc_min_per_mile(elapsed, total_distance_miles, vanity_factor))
    } else {
        None
    };

    let metrics = SpeedMetrics {
        max_knots: max(&series.speed_knots),
        max_mps: max(&series.speed_mps),
        max_mps_computed: max(&series.speed_mps_computed),
        max_mph: max(&series.speed_mph),
        mean_knots: mean(&series.speed_knots),
        mean_mps: mean(&series.speed_mps),
        mean_mps_computed: mean(&series.speed_mps_computed),
        mean_mph: mean(&series.speed_mph),
        total_distance_km: total_metres / 1000.0,
        total_distance_miles,
        average_pace,
    };

    info!(
        "Max speeds: {:.3} knots, {:.3} m/s, {:.3} m/s (computed), {:.3} mph",
        metrics.max_knots, metrics.max_mps, metrics.max_mps_computed, metrics.max_mph
    );
    info!(
        "Average speeds: {:.3} knots, {:.3} m/s, {:.3} m/s (computed), {:.3} mph",
        metrics.mean_knots, metrics.mean_mps, metrics.mean_mps_computed, metrics.mean_mph
    );
    info!(
        "Total distance: {:.3} km, {:.3} miles",
        metrics.total_distance_km, metrics.total_distance_miles
    );

    Ok(metrics)
}

/// Extracts the speed series, summarises it, and splits the track every
/// `split_distance_metres`. The record indexes in the returned splits refer
/// to `track`, even if some records had to be skipped.
#[time]
pub fn calculate_track_statistics(
    track: &Track,
    split_distance_metres: f64,
    config: &StatsConfig,
) -> Result<TrackStatistics> {
    config.validate()?;
    let series = extract_distance_and_speed(track)?;
    let speed_metrics = calc_speed_metrics(&series, config.vanity_factor)?;

    let mut splits = report_splits(
        &series.distance,
        &series.timestamps,
        split_distance_metres,
        config.vanity_factor,
    )?;

    for split in &mut splits {
        split.record_index = series.indices[split.record_index];
    }

    Ok(TrackStatistics {
        split_distance_metres,
        speed_metrics,
        splits,
        skipped_records: series.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: &str, date: &str, distance: &str, knots: &str) -> GpsRecord {
        GpsRecord::from_line(format!(
            "{time},38.88,-77.03,15.0,{distance},9,1,{knots},270.0,{date}"
        ))
        .unwrap()
    }

    #[test]
    fn test_timing_stats() {
        let track: Track = vec![
            record("101500", "091115", "0", "0"),
            record("101600", "091115", "10", "1"),
            record("103000", "091115", "10", "1"),
        ]
        .into_iter()
        .collect();

        assert_eq!(report_timing_stats(&track).unwrap(), Duration::minutes(15));
    }

    #[test]
    fn test_timing_stats_across_midnight() {
        let track: Track = vec![
            record("235000", "311215", "0", "0"),
            record("001000", "010116", "10", "1"),
        ]
        .into_iter()
        .collect();

        assert_eq!(report_timing_stats(&track).unwrap(), Duration::minutes(20));
    }

    #[test]
    fn test_timing_stats_backwards_is_negative() {
        let track: Track = vec![
            record("120000", "020116", "0", "0"),
            record("120000", "010116", "10", "1"),
        ]
        .into_iter()
        .collect();

        assert_eq!(report_timing_stats(&track).unwrap(), Duration::days(-1));
    }

    #[test]
    fn test_timing_stats_skips_bad_ends() {
        let track: Track = vec![
            record("??", "091115", "0", "0"),
            record("100000", "091115", "0", "0"),
            record("100100", "091115", "0", "0"),
            record("100200", "999999", "0", "0"),
        ]
        .into_iter()
        .collect();

        assert_eq!(report_timing_stats(&track).unwrap(), Duration::minutes(1));
    }

    #[test]
    fn test_timing_stats_preconditions() {
        assert!(matches!(
            report_timing_stats(&Track::default()),
            Err(StatsError::Precondition(_))
        ));

        let track: Track = vec![record("x", "y", "0", "0")].into_iter().collect();
        assert!(matches!(
            report_timing_stats(&track),
            Err(StatsError::Precondition(_))
        ));
    }

    #[test]
    fn test_single_record_has_zero_duration() {
        let track: Track = vec![record("101500", "091115", "0", "0")].into_iter().collect();
        assert_eq!(report_timing_stats(&track).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_speed_metrics() {
        let track: Track = vec![
            record("100000", "091115", "0", "0"),
            record("100100", "091115", "400", "10"),
            record("100200", "091115", "800", "20"),
        ]
        .into_iter()
        .collect();

        let series = extract_distance_and_speed(&track).unwrap();
        let metrics = calc_speed_metrics(&series, 1.0).unwrap();
        assert_eq!(metrics.max_knots, 20.0);
        assert_eq!(metrics.mean_knots, 10.0);
        assert!((metrics.max_mps_computed - 800.0 / 60.0).abs() < 1e-9);
        assert!((metrics.total_distance_km - 1.2).abs() < 1e-9);
        assert!((metrics.total_distance_miles - 1200.0 * 0.000621371).abs() < 1e-9);
        assert!(metrics.average_pace.is_some());
    }

    #[test]
    fn test_mismatched_series_is_a_precondition_error() {
        let series = SpeedSeries {
            indices: vec![0],
            distance: vec![1.0],
            speed_knots: vec![1.0],
            speed_mps: vec![1.0],
            speed_mps_computed: vec![0.0],
            speed_mph: vec![1.0],
            timestamps: vec![],
            skipped: 0,
        };

        assert!(matches!(
            calc_speed_metrics(&series, 1.0),
            Err(StatsError::Precondition(_))
        ));
    }

    #[test]
    fn test_bad_vanity_factor_is_rejected() {
        let track: Track = vec![
            record("100000", "091115", "0", "0"),
            record("100100", "091115", "400", "10"),
        ]
        .into_iter()
        .collect();

        for vanity_factor in [-1.0, 0.0, f64::NAN] {
            let config = StatsConfig {
                vanity_factor,
                ..StatsConfig::default()
            };
            assert!(matches!(
                calculate_track_statistics(&track, 100.0, &config),
                Err(StatsError::Precondition(_))
            ));
        }

        let series = extract_distance_and_speed(&track).unwrap();
        assert!(calc_speed_metrics(&series, -0.15).is_err());
    }

    #[test]
    fn test_stationary_track_has_no_pace() {
        let track: Track = vec![
            record("100000", "091115", "0", "0"),
            record("100100", "091115", "0", "0"),
        ]
        .into_iter()
        .collect();

        let stats = calculate_track_statistics(&track, 100.0, &StatsConfig::default()).unwrap();
        assert_eq!(stats.speed_metrics.average_pace, None);
        assert_eq!(stats.splits.len(), 1);
        assert_eq!(stats.splits[0].pace, None);
    }

    #[test]
    fn test_split_indices_refer_to_track() {
        let track: Track = vec![
            record("100000", "091115", "0", "5"),
            record("100010", "091115", "bad", "5"),
            record("100020", "091115", "60", "5"),
            record("100030", "091115", "60", "5"),
            record("100040", "091115", "60", "5"),
        ]
        .into_iter()
        .collect();

        let stats = calculate_track_statistics(&track, 100.0, &StatsConfig::default()).unwrap();
        assert_eq!(stats.skipped_records, 1);
        // The split is crossed at the second 60m record, which is record 3
        // of the track but entry 2 of the series.
        assert_eq!(stats.splits[0].record_index, 3);
        assert_eq!(stats.splits.last().unwrap().record_index, 4);
    }
}
