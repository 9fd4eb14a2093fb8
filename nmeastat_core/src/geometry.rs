//! Coordinate extraction and the bounding box of a track.

use geo::{coord, BoundingRect, MultiPoint, Point, Rect};
use log::{debug, warn};

use crate::{
    error::{Result, StatsError},
    model::{BoundingBox, LatLongs, Track},
};

/// Pulls the latitude and longitude off the first `num_points` records of
/// the track (all of them if `num_points` is larger than the track). Records
/// whose coordinates do not parse are left out and counted in `skipped`.
pub fn extract_lats_and_longs(track: &Track, num_points: usize) -> LatLongs {
    let num_points = num_points.min(track.len());
    let mut result = LatLongs {
        lats: Vec::with_capacity(num_points),
        longs: Vec::with_capacity(num_points),
        skipped: 0,
    };

    for record in track.iter().take(num_points) {
        match (record.latitude(), record.longitude()) {
            (Ok(lat), Ok(long)) => {
                result.lats.push(lat);
                result.longs.push(long);
            }
            (Err(e), _) | (_, Err(e)) => {
                debug!("Skipping record: {e}");
                result.skipped += 1;
            }
        }
    }

    if result.skipped > 0 {
        warn!(
            "{} of {num_points} records had unusable coordinates and were skipped",
            result.skipped
        );
    }

    result
}

/// Works out the extent of the whole track. The mean position is the mean
/// of every fix rather than the centre of the box, so it sits where the
/// track spends most of its time.
pub fn calc_bounding_box(track: &Track) -> Result<BoundingBox> {
    if track.is_empty() {
        return Err(StatsError::precondition(
            "cannot calculate the bounding box of an empty track",
        ));
    }

    let ll = extract_lats_and_longs(track, track.len());

    // n.b. x=lon, y=lat.
    let points: MultiPoint<f64> = ll
        .longs
        .iter()
        .zip(&ll.lats)
        .map(|(&long, &lat)| Point::new(long, lat))
        .collect();

    let rect = points.bounding_rect().ok_or_else(|| {
        StatsError::precondition("no record in the track has usable coordinates")
    })?;

    let n = ll.lats.len() as f64;
    let bbox = BoundingBox {
        mean_lat: ll.lats.iter().sum::<f64>() / n,
        mean_long: ll.longs.iter().sum::<f64>() / n,
        lat_span: rect.height(),
        long_span: rect.width(),
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_long: rect.min().x,
        max_long: rect.max().x,
    };

    debug!("{:?}", bbox);
    Ok(bbox)
}

impl BoundingBox {
    /// Returns the box as a geo Rect, grown on every side by `margin_degrees`.
    pub fn to_rect(&self, margin_degrees: f64) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_long - margin_degrees, y: self.min_lat - margin_degrees },
            coord! { x: self.max_long + margin_degrees, y: self.max_lat + margin_degrees },
        )
    }
}
