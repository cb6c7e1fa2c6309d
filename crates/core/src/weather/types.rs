//! Types for weather snapshots and derived analyses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_HUMIDITY, DEFAULT_WIND_SPEED};
use crate::errors::ApplicationError;

/// Raw observation handed over by the weather fetch collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub location: String,
    pub current: CurrentWeather,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

impl WeatherSnapshot {
    pub fn from_json(raw: &str) -> Result<Self, ApplicationError> {
        serde_json::from_str(raw)
            .map_err(|error| ApplicationError::Input(format!("invalid weather snapshot: {error}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temperature: f64,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
}

impl CurrentWeather {
    pub fn humidity_or_default(&self) -> f64 {
        self.humidity.unwrap_or(DEFAULT_HUMIDITY)
    }

    pub fn wind_speed_or_default(&self) -> f64 {
        self.wind_speed.unwrap_or(DEFAULT_WIND_SPEED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    #[serde(default)]
    pub day: String,
    #[serde(alias = "temp")]
    pub temperature: f64,
    #[serde(default)]
    pub condition: String,
}

/// Case-insensitive keyword flags read off a condition description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionFlags {
    pub rainy: bool,
    pub snowy: bool,
    pub cloudy: bool,
    pub sunny: bool,
}

impl ConditionFlags {
    pub fn from_text(condition: &str) -> Self {
        let lower = condition.to_lowercase();
        Self {
            rainy: lower.contains("rain") || lower.contains("drizzle"),
            snowy: lower.contains("snow"),
            cloudy: lower.contains("cloud"),
            sunny: lower.contains("clear") || lower.contains("sun"),
        }
    }

    /// Rain, drizzle or snow
    pub fn precipitating(&self) -> bool {
        self.rainy || self.snowy
    }
}

/// Eight-step temperature scale with boundaries at 0/5/10/15/20/25/30 °C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempCategory {
    Freezing,
    VeryCold,
    Cold,
    Cool,
    #[default]
    Mild,
    Warm,
    Hot,
    VeryHot,
}

impl TempCategory {
    pub const ALL: [TempCategory; 8] = [
        TempCategory::Freezing,
        TempCategory::VeryCold,
        TempCategory::Cold,
        TempCategory::Cool,
        TempCategory::Mild,
        TempCategory::Warm,
        TempCategory::Hot,
        TempCategory::VeryHot,
    ];

    pub fn from_temperature(temperature: f64) -> Self {
        if temperature < 0.0 {
            TempCategory::Freezing
        } else if temperature < 5.0 {
            TempCategory::VeryCold
        } else if temperature < 10.0 {
            TempCategory::Cold
        } else if temperature < 15.0 {
            TempCategory::Cool
        } else if temperature < 20.0 {
            TempCategory::Mild
        } else if temperature < 25.0 {
            TempCategory::Warm
        } else if temperature < 30.0 {
            TempCategory::Hot
        } else {
            TempCategory::VeryHot
        }
    }

    pub fn ordinal(&self) -> usize {
        Self::ALL.iter().position(|category| category == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Warming,
    Cooling,
    #[default]
    Stable,
}

/// Three-step level shared by volatility and precipitation risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecipitationType {
    Snow,
    Rain,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComfortLevel {
    Comfortable,
    #[default]
    Moderate,
    Uncomfortable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorRating {
    Ideal,
    #[default]
    Suboptimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindRating {
    #[default]
    Calm,
    Breezy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StabilityLevel {
    #[default]
    #[serde(rename = "very stable")]
    VeryStable,
    #[serde(rename = "moderately stable")]
    ModeratelyStable,
    #[serde(rename = "unstable")]
    Unstable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    Night,
    #[default]
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => DayPeriod::Night,
            6..=11 => DayPeriod::Morning,
            12..=16 => DayPeriod::Afternoon,
            17..=20 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }
}

/// Structured view of a snapshot. Every block tolerates missing fields when
/// deserialized, falling back to the documented defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherAnalysis {
    pub current_conditions: CurrentConditions,
    pub temperature_trend: TemperatureTrend,
    pub precipitation_risk: PrecipitationRisk,
    pub comfort_index: ComfortIndex,
    pub weather_stability: WeatherStability,
    pub time_of_day: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_category: TempCategory,
    pub condition: String,
    pub is_rainy: bool,
    pub is_snowy: bool,
    pub is_cloudy: bool,
    pub is_sunny: bool,
    pub humidity: f64,
    pub wind_speed: f64,
}

impl Default for CurrentConditions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            feels_like: 0.0,
            temp_category: TempCategory::from_temperature(0.0),
            condition: String::new(),
            is_rainy: false,
            is_snowy: false,
            is_cloudy: false,
            is_sunny: false,
            humidity: DEFAULT_HUMIDITY,
            wind_speed: DEFAULT_WIND_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemperatureTrend {
    pub trend: TrendDirection,
    pub change: f64,
    pub volatility: Level,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub range: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrecipitationRisk {
    pub level: Level,
    pub score: f64,
    pub is_currently_rainy: bool,
    pub forecast_rain_probability: f64,
    #[serde(rename = "type")]
    pub precipitation_type: PrecipitationType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComfortIndex {
    pub score: f64,
    pub level: ComfortLevel,
    pub factors: ComfortFactors,
}

impl Default for ComfortIndex {
    fn default() -> Self {
        Self { score: 50.0, level: ComfortLevel::Moderate, factors: ComfortFactors::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortFactors {
    pub temperature: FactorRating,
    pub humidity: FactorRating,
    pub wind: WindRating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherStability {
    pub stable: bool,
    pub score: f64,
    pub level: StabilityLevel,
}

impl Default for WeatherStability {
    fn default() -> Self {
        Self { stable: true, score: 1.0, level: StabilityLevel::VeryStable }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeOfDay {
    pub hour: u32,
    pub period: DayPeriod,
    pub is_work_hours: bool,
    pub needs_all_day_gear: bool,
}

/// One logged analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: WeatherAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Quarter of the calendar year, January through March being winter.
    pub fn from_month0(month0: u32) -> Self {
        match month0 / 3 {
            0 => Season::Winter,
            1 => Season::Spring,
            2 => Season::Summer,
            _ => Season::Fall,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPattern {
    pub season: Season,
    pub avg_temperature: f64,
    pub rain_frequency: f64,
    pub data_points: usize,
}
