//! The error types returned by the statistics engine.
//!
//! There are three families of failure. Structural errors mean the input is
//! not laid out the way we expect (typically a GPRMC-only stream fed in where
//! GPGGA+GPRMC pairs were assumed) and abort the run. Value errors and
//! timestamp failures are confined to a single record; the aggregate
//! functions skip such records and count them. Precondition errors are
//! caller mistakes such as asking for statistics on an empty track.

use std::fmt;

use thiserror::Error;

use crate::model::Field;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Structural error ({reason}) in record {line:?}")]
    Structural { reason: String, line: String },

    #[error("Could not parse the {field} field from {value:?} in record {line:?}")]
    Value {
        field: Field,
        value: String,
        line: String,
    },

    #[error(transparent)]
    Timestamp(#[from] ParseFailure),

    #[error("Precondition failed: {0}")]
    Precondition(String),
}

impl StatsError {
    pub(crate) fn precondition<S: Into<String>>(msg: S) -> Self {
        Self::Precondition(msg.into())
    }

    /// Returns true for errors that only affect one record and can be
    /// skipped when calculating aggregates.
    pub fn is_per_record(&self) -> bool {
        matches!(self, Self::Value { .. } | Self::Timestamp(_))
    }
}

/// Returned when the date and time fields of a record do not form a valid
/// calendar timestamp. Carries everything needed to diagnose the line.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Could not build a timestamp from date {date:?} and time {time:?} ({reason}) in record {line:?}")]
pub struct ParseFailure {
    pub line: String,
    pub date: String,
    pub time: String,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    MalformedDate,
    MalformedTime,
    OutOfRange,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MalformedDate => write!(f, "malformed date"),
            FailureReason::MalformedTime => write!(f, "malformed time"),
            FailureReason::OutOfRange => write!(f, "out of calendar range"),
        }
    }
}
