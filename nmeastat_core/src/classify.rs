//! Deciding whether a track is a commute or a workout.

use geo::{coord, Intersects};
use log::{debug, info};

use crate::{
    config::{CommuteConfig, ReferenceRoute},
    model::BoundingBox,
};

/// Returns true if the track looks like a commute.
///
/// Anything averaging less than `min_commute_mph` is taken to be a walk or
/// a jog. Faster tracks are commutes if their bounding box (grown by
/// `anchor_margin_degrees`) takes in every anchor of at least one of the
/// reference routes. With no reference routes configured, the speed test
/// alone decides.
pub fn is_commute_track(bbox: &BoundingBox, avg_mph: f64, config: &CommuteConfig) -> bool {
    if avg_mph < config.min_commute_mph {
        debug!("Avg MPH is {avg_mph:.1}, too slow for a commute");
        return false;
    }

    info!("Avg MPH is {avg_mph:.1}, too fast for a jog");

    if config.routes.is_empty() {
        debug!("No reference routes configured, classifying on speed alone");
        return true;
    }

    match config
        .routes
        .iter()
        .find(|route| bbox_contains_route(bbox, route, config.anchor_margin_degrees))
    {
        Some(route) => {
            info!("Track covers the '{}' route", route.name);
            true
        }
        None => {
            info!("Track does not cover any of the {} known routes", config.routes.len());
            false
        }
    }
}

/// True if every anchor of the route lies inside the bounding box.
pub fn bbox_contains_route(bbox: &BoundingBox, route: &ReferenceRoute, margin_degrees: f64) -> bool {
    if route.anchors.is_empty() {
        return false;
    }

    let rect = bbox.to_rect(margin_degrees);

    // n.b. x=lon, y=lat.
    route
        .anchors
        .iter()
        .all(|anchor| rect.intersects(&coord! { x: anchor.long, y: anchor.lat }))
}
