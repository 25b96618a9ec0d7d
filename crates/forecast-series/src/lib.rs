//! Forecast chart series synthesis.
//!
//! Turns a [`session_core::PredictionSet`] into one ordered, renderable
//! series of chart points merging historical values, point forecasts and
//! horizon-widening confidence bands.

pub mod series;


pub use series::{build_series, build_series_today, HISTORY_DAYS};
