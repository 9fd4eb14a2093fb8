use std::{ops::Index, slice, str::FromStr};

use log::debug;

use crate::{
    error::{Result, StatsError},
    model::{Field, GpsRecord, Track, NUM_FIELDS},
};

impl GpsRecord {
    /// Makes a record from one comma-separated line in the normalized
    /// format. Only the layout is checked here; the values are converted
    /// when they are asked for. A line with fewer than 10 fields has no date,
    /// which means the stream is not in the format we expect.
    pub fn from_line<S: Into<String>>(line: S) -> Result<Self> {
        let line = line.into();
        let parts: Vec<&str> = line.trim().split(',').collect();

        if parts.len() < NUM_FIELDS {
            return Err(StatsError::Structural {
                reason: format!(
                    "expected {NUM_FIELDS} fields but found {}, is the input GPRMC-only?",
                    parts.len()
                ),
                line,
            });
        }

        if parts.len() > NUM_FIELDS {
            debug!(
                "Ignoring {} trailing fields in record {:?}",
                parts.len() - NUM_FIELDS,
                line
            );
        }

        let fields = std::array::from_fn(|idx| parts[idx].trim().to_owned());
        Ok(Self { line, fields })
    }

    /// The line the record was made from.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The unconverted text of a field.
    pub fn field(&self, field: Field) -> &str {
        &self.fields[field.index()]
    }

    /// Converts a field, producing a Value error that names the field and
    /// quotes the line if it cannot be done.
    pub fn parse_field<T: FromStr>(&self, field: Field) -> Result<T> {
        let value = self.field(field);
        value.parse::<T>().map_err(|_| StatsError::Value {
            field,
            value: value.to_owned(),
            line: self.line.clone(),
        })
    }

    /// Like `parse_field`, but NaN and infinities are errors too. Nothing
    /// downstream can do anything sensible with them.
    pub fn parse_finite(&self, field: Field) -> Result<f64> {
        let value: f64 = self.parse_field(field)?;
        if !value.is_finite() {
            return Err(StatsError::Value {
                field,
                value: self.field(field).to_owned(),
                line: self.line.clone(),
            });
        }

        Ok(value)
    }

    pub fn latitude(&self) -> Result<f64> {
        self.parse_finite(Field::Latitude)
    }

    pub fn longitude(&self) -> Result<f64> {
        self.parse_finite(Field::Longitude)
    }

    pub fn altitude(&self) -> Result<f64> {
        self.parse_finite(Field::Altitude)
    }

    pub fn distance_metres(&self) -> Result<f64> {
        self.parse_finite(Field::Distance)
    }

    pub fn num_satellites(&self) -> Result<u8> {
        self.parse_field(Field::NumSatellites)
    }

    pub fn fix_quality(&self) -> Result<u8> {
        self.parse_field(Field::FixQuality)
    }

    pub fn speed_knots(&self) -> Result<f64> {
        self.parse_finite(Field::SpeedKnots)
    }

    pub fn course(&self) -> Result<f64> {
        self.parse_finite(Field::Course)
    }
}

impl Track {
    pub fn new(records: Vec<GpsRecord>) -> Self {
        Self { records }
    }

    /// Appends a fix to the end of the track.
    pub fn push(&mut self, record: GpsRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&GpsRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&GpsRecord> {
        self.records.last()
    }

    pub fn get(&self, index: usize) -> Option<&GpsRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, GpsRecord> {
        self.records.iter()
    }

    /// Returns a new track holding copies of the records in `start..end`.
    /// Used to cut GPS noise off the start and end of a recording. The new
    /// track shares nothing with this one.
    pub fn slice(&self, start: usize, end: usize) -> Result<Track> {
        if start >= end || end > self.len() {
            return Err(StatsError::precondition(format!(
                "cannot slice {start}..{end} from a track of {} records",
                self.len()
            )));
        }

        debug!("Slicing track to records {start}..{end} of {}", self.len());
        Ok(Track::new(self.records[start..end].to_vec()))
    }

    /// The index of the last record. Just a convenience fn to avoid
    /// off-by-one errors (hopefully).
    pub(crate) fn last_valid_idx(&self) -> usize {
        self.len() - 1
    }
}

impl Index<usize> for Track {
    type Output = GpsRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl FromIterator<GpsRecord> for Track {
    fn from_iter<I: IntoIterator<Item = GpsRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a GpsRecord;
    type IntoIter = slice::Iter<'a, GpsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "123519.000,38.889,-77.023,12.5,4.2,8,1,3.1,84.4,230394";

    #[test]
    fn test_from_line_reads_all_fields() {
        let rec = GpsRecord::from_line(LINE).unwrap();
        assert_eq!(rec.field(Field::Time), "123519.000");
        assert_eq!(rec.latitude().unwrap(), 38.889);
        assert_eq!(rec.longitude().unwrap(), -77.023);
        assert_eq!(rec.altitude().unwrap(), 12.5);
        assert_eq!(rec.distance_metres().unwrap(), 4.2);
        assert_eq!(rec.num_satellites().unwrap(), 8);
        assert_eq!(rec.fix_quality().unwrap(), 1);
        assert_eq!(rec.speed_knots().unwrap(), 3.1);
        assert_eq!(rec.course().unwrap(), 84.4);
        assert_eq!(rec.field(Field::Date), "230394");
        assert_eq!(rec.line(), LINE);
    }

    #[test]
    fn test_missing_date_is_structural() {
        let err = GpsRecord::from_line("123519,38.889,-77.023,12.5,4.2,8,1,3.1,84.4").unwrap_err();
        match err {
            StatsError::Structural { line, .. } => assert!(line.starts_with("123519")),
            e => panic!("expected a structural error, got {e:?}"),
        }
    }

    #[test]
    fn test_bad_value_names_the_field() {
        let rec = GpsRecord::from_line("123519,abc,-77.023,12.5,4.2,8,1,3.1,84.4,230394").unwrap();
        let err = rec.latitude().unwrap_err();
        assert!(err.is_per_record());
        assert_eq!(
            err,
            StatsError::Value {
                field: Field::Latitude,
                value: "abc".to_owned(),
                line: rec.line().to_owned(),
            }
        );
        // The other fields are still usable.
        assert_eq!(rec.longitude().unwrap(), -77.023);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let rec = GpsRecord::from_line("123519,38.9,-77.0,12.5,NaN,8,1,inf,84.4,230394").unwrap();
        assert!(matches!(
            rec.distance_metres(),
            Err(StatsError::Value { field: Field::Distance, .. })
        ));
        assert!(matches!(
            rec.speed_knots(),
            Err(StatsError::Value { field: Field::SpeedKnots, .. })
        ));
    }

    #[test]
    fn test_slice_is_independent_of_parent() {
        let mut track: Track = (0..5)
            .map(|i| GpsRecord::from_line(format!("12000{i},1,2,3,4,5,6,7,8,010120")).unwrap())
            .collect();

        let sliced = track.slice(1, 4).unwrap();
        assert_eq!(sliced.len(), 3);
        assert_eq!(sliced[0], track[1]);
        assert_eq!(sliced.last(), track.get(3));

        track.push(GpsRecord::from_line(LINE).unwrap());
        assert_eq!(track.len(), 6);
        assert_eq!(sliced.len(), 3);
    }

    #[test]
    fn test_slice_rejects_bad_bounds() {
        let track: Track = (0..3)
            .map(|_| GpsRecord::from_line(LINE).unwrap())
            .collect();

        assert!(matches!(track.slice(2, 2), Err(StatsError::Precondition(_))));
        assert!(matches!(track.slice(0, 4), Err(StatsError::Precondition(_))));
        assert!(matches!(track.slice(3, 1), Err(StatsError::Precondition(_))));
        assert_eq!(track.slice(0, 3).unwrap(), track);
    }
}
