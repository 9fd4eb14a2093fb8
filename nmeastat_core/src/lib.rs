pub mod classify;
pub mod config;
pub mod error;
pub mod formatting;
pub mod geometry;
pub mod model;
mod model_impls;
pub mod read;
pub mod speed;
pub mod split;
pub mod stats;
pub mod timestamp;

pub use error::{Result, StatsError};
pub use model::{GpsRecord, Track};
