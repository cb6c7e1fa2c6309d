//! Weather analysis
//!
//! Derives trend, precipitation risk, comfort, stability and time-of-day
//! context from a raw snapshot, and keeps a bounded log for seasonal queries.

mod analyzer;
mod types;

pub use analyzer::{derive_analysis, feels_like, WeatherAnalyzer};
pub use types::*;

/// Humidity assumed when the observation omits it
pub const DEFAULT_HUMIDITY: f64 = 50.0;

/// Wind speed assumed when the observation omits it
pub const DEFAULT_WIND_SPEED: f64 = 0.0;

/// Number of analyses kept in the historical log
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Minimum same-season entries before seasonal patterns are reported
pub const SEASONAL_MIN_ENTRIES: usize = 5;
