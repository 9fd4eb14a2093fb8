//! Building timestamps out of the separate date and time fields.

use log::warn;
use time::{macros::format_description, Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

use crate::{
    error::{FailureReason, ParseFailure},
    model::{Field, GpsRecord},
};

/// Builds the UTC timestamp of a fix from its date (DDMMYY, always taken to
/// be in the 2000s) and time (HHMMSS, any fractional part is dropped)
/// fields. The failure is logged with the raw line before being returned.
pub fn extract_date_time(record: &GpsRecord) -> Result<OffsetDateTime, ParseFailure> {
    let date = record.field(Field::Date);
    let time = record.field(Field::Time);

    build_date_time(date, time).map_err(|reason| {
        let failure = ParseFailure {
            line: record.line().to_owned(),
            date: date.to_owned(),
            time: time.to_owned(),
            reason,
        };
        warn!("{failure}");
        failure
    })
}

/// Renders the timestamp of a fix as "HH:MM:SS MM/DD/YYYY".
pub fn extract_time_string(record: &GpsRecord) -> Result<String, ParseFailure> {
    extract_date_time(record).map(format_timestamp)
}

/// Formats a timestamp as "HH:MM:SS MM/DD/YYYY".
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    // Only fails for formats that need an offset or a large year.
    timestamp
        .format(format_description!(
            "[hour]:[minute]:[second] [month]/[day]/[year]"
        ))
        .unwrap_or_else(|_| timestamp.to_string())
}

fn build_date_time(date: &str, time: &str) -> Result<OffsetDateTime, FailureReason> {
    if date.len() != 6 {
        return Err(FailureReason::MalformedDate);
    }
    let day = two_digits(date, 0).ok_or(FailureReason::MalformedDate)?;
    let month = two_digits(date, 2).ok_or(FailureReason::MalformedDate)?;
    let year = two_digits(date, 4).ok_or(FailureReason::MalformedDate)?;

    let hour = two_digits(time, 0).ok_or(FailureReason::MalformedTime)?;
    let minute = two_digits(time, 2).ok_or(FailureReason::MalformedTime)?;
    let second = two_digits(time, 4).ok_or(FailureReason::MalformedTime)?;
    match time.get(6..) {
        None | Some("") => {}
        Some(fraction) => match fraction.strip_prefix('.') {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {}
            _ => return Err(FailureReason::MalformedTime),
        },
    }

    let month = Month::try_from(month).map_err(|_| FailureReason::OutOfRange)?;
    let date = Date::from_calendar_date(2000 + year as i32, month, day)
        .map_err(|_| FailureReason::OutOfRange)?;
    let time = Time::from_hms(hour, minute, second).map_err(|_| FailureReason::OutOfRange)?;

    Ok(PrimitiveDateTime::new(date, time).assume_utc())
}

/// Reads the two ASCII digits at `start`.
fn two_digits(s: &str, start: usize) -> Option<u8> {
    let digits = s.get(start..start + 2)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}
