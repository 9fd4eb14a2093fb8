use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use logging_timer::time;

use crate::model::{GpsRecord, Track};

/// Reads a track from a file of comma-separated records, one fix per line.
#[time]
pub fn read_track_from_file<P: AsRef<Path>>(input_file: P) -> Result<Track> {
    let input_file = input_file.as_ref();
    info!("Reading track file {:?}", input_file);
    let file =
        File::open(input_file).with_context(|| format!("Failed to open {:?}", input_file))?;
    let track = read_track_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read a track from {:?}", input_file))?;
    info!("Read {} records from {:?}", track.len(), input_file);
    Ok(track)
}

pub fn read_track_from_str(data: &str) -> Result<Track> {
    read_track_from_reader(data.as_bytes())
}

/// Reads records until EOF. Blank lines are ignored, anything else must be a
/// complete record; the first line that is not aborts the read.
pub fn read_track_from_reader<R: BufRead>(reader: R) -> Result<Track> {
    let mut track = Track::default();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            debug!("Skipping blank line {}", line_number + 1);
            continue;
        }

        match GpsRecord::from_line(line) {
            Ok(record) => track.push(record),
            Err(e) => bail!("Line {}: {e}", line_number + 1),
        }
    }

    if track.is_empty() {
        bail!("Input was not in the expected format: it contains no records");
    }

    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_track() {
        let data = "101500,38.88,-77.03,15.0,0.0,9,1,0.0,270.0,091115\n\
                    \n\
                    101501,38.88,-77.03,15.0,2.5,9,1,4.8,270.0,091115\n";

        let track = read_track_from_str(data).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track[1].distance_metres().unwrap(), 2.5);
    }

    #[test]
    fn test_short_line_names_the_line() {
        let data = "101500,38.88,-77.03,15.0,0.0,9,1,0.0,270.0,091115\n\
                    101501,38.88,-77.03\n";

        let err = read_track_from_str(data).unwrap_err();
        assert!(err.to_string().starts_with("Line 2:"), "{err}");
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(read_track_from_str("").is_err());
        assert!(read_track_from_str("\n  \n").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_track_from_file("/this/file/does/not/exist.csv").is_err());
    }
}
