//! Unit conversions and the per-record distance and speed series.

use log::{debug, warn};

use crate::{
    error::{Result, StatsError},
    model::{SpeedSeries, Track},
    timestamp::extract_date_time,
};

pub const KNOTS_TO_MPS: f64 = 0.514444;
pub const KNOTS_TO_MPH: f64 = 1.15078;
pub const METRES_TO_MILES: f64 = 0.000621371;

pub fn knots_to_mps(knots: f64) -> f64 {
    knots * KNOTS_TO_MPS
}

pub fn knots_to_mph(knots: f64) -> f64 {
    knots * KNOTS_TO_MPH
}

pub fn metres_to_miles(metres: f64) -> f64 {
    metres * METRES_TO_MILES
}

/// Reads the distance, speed and timestamp of every record and derives the
/// other speed units from them.
///
/// The computed speed is distance / whole seconds since the previous entry.
/// The first entry has no predecessor and gets 0. Consecutive fixes that
/// share a whole-second timestamp (or go backwards in time) also get 0
/// rather than a division by zero.
///
/// A record with an unusable distance, speed or timestamp is left out of the
/// series altogether so that the vectors stay parallel; `indices` maps each
/// entry back to its record.
pub fn extract_distance_and_speed(track: &Track) -> Result<SpeedSeries> {
    let mut series = SpeedSeries::default();

    for (idx, record) in track.iter().enumerate() {
        let values = record.distance_metres().and_then(|distance| {
            let knots = record.speed_knots()?;
            let timestamp = extract_date_time(record)?;
            Ok((distance, knots, timestamp))
        });

        let (distance, knots, timestamp) = match values {
            Ok(v) => v,
            Err(e) => {
                debug!("Excluding record {idx} from the speed series: {e}");
                series.skipped += 1;
                continue;
            }
        };

        let computed = match series.timestamps.last() {
            None => 0.0,
            Some(&prev) => {
                let seconds = (timestamp - prev).whole_seconds();
                if seconds > 0 {
                    distance / seconds as f64
                } else {
                    debug!("Record {idx} is {seconds}s after its predecessor, using a computed speed of 0");
                    0.0
                }
            }
        };

        series.indices.push(idx);
        series.distance.push(distance);
        series.speed_knots.push(knots);
        series.speed_mps.push(knots_to_mps(knots));
        series.speed_mps_computed.push(computed);
        series.speed_mph.push(knots_to_mph(knots));
        series.timestamps.push(timestamp);
    }

    if series.skipped > 0 {
        warn!(
            "{} of {} records were excluded from the speed series",
            series.skipped,
            track.len()
        );
    }

    if series.indices.is_empty() {
        return Err(StatsError::precondition(
            "no record in the track has a usable distance, speed and timestamp",
        ));
    }

    Ok(series)
}

/// The mean speed in mph over the whole track, read straight from the speed
/// field. This is cheap enough to call before deciding what sort of track
/// we are dealing with.
pub fn extract_avg_mph(track: &Track) -> Result<f64> {
    let mut skipped = 0;
    let speeds: Vec<f64> = track
        .iter()
        .filter_map(|record| match record.speed_knots() {
            Ok(knots) => Some(knots_to_mph(knots)),
            Err(e) => {
                debug!("{e}");
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        warn!("{skipped} records with an unusable speed were excluded from the average");
    }

    if speeds.is_empty() {
        return Err(StatsError::precondition(
            "cannot average the speed of a track with no usable speeds",
        ));
    }

    Ok(mean(&speeds))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
