//! Splitting a track into fixed-distance segments ("splits") and working
//! out the pace of each one.

use std::iter::once;

use log::{debug, info};
use time::OffsetDateTime;

use crate::{
    error::{Result, StatsError},
    formatting::{calc_min_per_mile, check_vanity_factor},
    model::SplitAnnotation,
    speed::metres_to_miles,
};

/// Finds the indices at which the running total of `distance` first goes
/// past each multiple of `split_distance_metres`. The result always starts
/// with 0 and is strictly increasing.
///
/// The thresholds are exact multiples of the split distance. They are not
/// re-based on where the previous split actually ended, so any overshoot is
/// not carried forward. At most one boundary is recorded per sample.
pub fn calc_split_indices(distance: &[f64], split_distance_metres: f64) -> Result<Vec<usize>> {
    if !split_distance_metres.is_finite() || split_distance_metres <= 0.0 {
        return Err(StatsError::precondition(format!(
            "split distance must be a positive number of metres, got {split_distance_metres}"
        )));
    }

    let mut indices = vec![0];
    let mut sum = 0.0;
    let mut next_split = split_distance_metres;

    for (idx, segment) in distance.iter().enumerate() {
        sum += segment;
        if sum > next_split {
            // The first sample is already a boundary.
            if idx > 0 {
                indices.push(idx);
            } else {
                debug!("The first sample alone covers a whole split ({sum}m)");
            }
            next_split += split_distance_metres;
        }
    }

    Ok(indices)
}

/// Produces one annotation per completed split plus one for whatever is
/// left over at the end, which is reported even if it has no length.
///
/// `distance[i]` is the distance covered between sample i-1 and sample i,
/// so a split running from boundary `a` to boundary `b` covers the
/// distances `a+1..=b` and takes `timestamps[b] - timestamps[a]`.
pub fn report_splits(
    distance: &[f64],
    timestamps: &[OffsetDateTime],
    split_distance_metres: f64,
    vanity_factor: f64,
) -> Result<Vec<SplitAnnotation>> {
    if distance.is_empty() {
        return Err(StatsError::precondition("cannot report splits for an empty track"));
    }

    if distance.len() != timestamps.len() {
        return Err(StatsError::precondition(format!(
            "have {} distances but {} timestamps",
            distance.len(),
            timestamps.len()
        )));
    }

    check_vanity_factor(vanity_factor)?;
    let indices = calc_split_indices(distance, split_distance_metres)?;

    let running_metres: Vec<f64> = distance
        .iter()
        .scan(0.0, |sum, d| {
            *sum += d;
            Some(*sum)
        })
        .collect();

    let last_idx = distance.len() - 1;
    let final_boundary = indices[indices.len() - 1];

    info!("Split Times:");
    let annotations = indices
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(once((final_boundary, last_idx)))
        .map(|(start, end)| {
            let segment_metres = running_metres[end] - running_metres[start];
            let segment_distance_miles = metres_to_miles(segment_metres);
            let elapsed = timestamps[end] - timestamps[start];

            let pace = if segment_distance_miles > 0.0 && !elapsed.is_negative() {
                Some(calc_min_per_mile(elapsed, segment_distance_miles, vanity_factor))
            } else {
                None
            };

            let annotation = SplitAnnotation {
                record_index: end,
                cum_distance_miles: metres_to_miles(running_metres[end]),
                segment_distance_miles,
                elapsed,
                pace,
            };

            info!(
                "{:.3}, {:.3}, {:.1}, {}",
                annotation.cum_distance_miles,
                annotation.segment_distance_miles,
                annotation.elapsed.as_seconds_f64(),
                annotation.pace.as_deref().unwrap_or("--:--.-")
            );

            annotation
        })
        .collect();

    Ok(annotations)
}
