use std::fmt;

use time::{Duration, OffsetDateTime};

/// The number of comma-separated fields in a normalized record. The date is
/// the last of them, so a shorter line is a structural error.
pub const NUM_FIELDS: usize = 10;

/// The positional fields of a normalized record. The discriminant is the
/// index of the field in the comma-separated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// HHMMSS, optionally followed by fractional seconds.
    Time = 0,
    /// Signed decimal degrees.
    Latitude = 1,
    /// Signed decimal degrees.
    Longitude = 2,
    Altitude = 3,
    /// Distance travelled since the previous fix, in metres.
    Distance = 4,
    NumSatellites = 5,
    FixQuality = 6,
    SpeedKnots = 7,
    Course = 8,
    /// DDMMYY.
    Date = 9,
}

impl Field {
    /// Returns the position of the field in the line.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Time => "time",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Altitude => "altitude",
            Field::Distance => "distance",
            Field::NumSatellites => "satellite count",
            Field::FixQuality => "fix quality",
            Field::SpeedKnots => "speed (knots)",
            Field::Course => "course",
            Field::Date => "date",
        };

        write!(f, "{name}")
    }
}

/// A single GPS fix, as produced by the NMEA parser. The fields are kept as
/// text and converted on demand so that one bad value only spoils the
/// record it lives in. The raw line is retained for error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsRecord {
    pub(crate) line: String,
    pub(crate) fields: [String; NUM_FIELDS],
}

/// An ordered list of fixes. Index 0 is the first fix. Tracks only grow;
/// trimming is done by taking a `slice()`, which copies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub(crate) records: Vec<GpsRecord>,
}

/// The rectangular extent of a track plus its mean position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Arithmetic mean of all the latitudes (not the centre of the box).
    pub mean_lat: f64,
    /// Arithmetic mean of all the longitudes.
    pub mean_long: f64,
    /// max_lat - min_lat.
    pub lat_span: f64,
    /// max_long - min_long.
    pub long_span: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_long: f64,
    pub max_long: f64,
}

/// Parallel coordinate lists extracted from the start of a track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatLongs {
    pub lats: Vec<f64>,
    pub longs: Vec<f64>,
    /// How many records were dropped because a coordinate did not parse.
    pub skipped: usize,
}

/// Distances and speeds for every usable record in a track. All the vectors
/// have the same length; `indices[i]` is the index into the track of the
/// record that produced entry `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedSeries {
    pub indices: Vec<usize>,
    /// Distance from the previous fix, in metres.
    pub distance: Vec<f64>,
    pub speed_knots: Vec<f64>,
    /// Speed over ground converted to m/s.
    pub speed_mps: Vec<f64>,
    /// Speed derived from the distance and the time since the previous entry.
    pub speed_mps_computed: Vec<f64>,
    pub speed_mph: Vec<f64>,
    pub timestamps: Vec<OffsetDateTime>,
    /// How many records were excluded because of value or timestamp errors.
    pub skipped: usize,
}

/// One row of the split report.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitAnnotation {
    /// Index of the record at which the split ends.
    pub record_index: usize,
    /// Distance from the start of the track to the end of this split.
    pub cum_distance_miles: f64,
    /// Length of this split.
    pub segment_distance_miles: f64,
    /// Time taken to cover this split.
    pub elapsed: Duration,
    /// "MM:SS.s" per mile. None if the split has no length.
    pub pace: Option<String>,
}

/// Headline speed figures for a track.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedMetrics {
    pub max_knots: f64,
    pub max_mps: f64,
    pub max_mps_computed: f64,
    pub max_mph: f64,
    pub mean_knots: f64,
    pub mean_mps: f64,
    pub mean_mps_computed: f64,
    pub mean_mph: f64,
    pub total_distance_km: f64,
    pub total_distance_miles: f64,
    /// Over the whole track. None if the track covers no distance.
    pub average_pace: Option<String>,
}

/// Everything `calculate_track_statistics` works out.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStatistics {
    pub split_distance_metres: f64,
    pub speed_metrics: SpeedMetrics,
    pub splits: Vec<SplitAnnotation>,
    /// Records excluded from the calculations because they did not parse.
    pub skipped_records: usize,
}
