//! Weather analyzer implementation

use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use tracing::debug;

use super::types::*;
use crate::config::AnalysisConfig;
use crate::store::{load_document, persist_or_warn, PreferenceStore, StoreKey};

/// Turns snapshots into [`WeatherAnalysis`] values and keeps a bounded log of
/// everything it has analyzed.
#[derive(Debug, Clone)]
pub struct WeatherAnalyzer {
    history: Vec<HistoricalEntry>,
    config: AnalysisConfig,
}

impl WeatherAnalyzer {
    /// Analyzer with an empty log.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { history: Vec::new(), config }
    }

    /// Analyzer seeded from the persisted log. An unreadable log starts empty.
    pub fn load(store: &dyn PreferenceStore, config: AnalysisConfig) -> Self {
        let mut history: Vec<HistoricalEntry> =
            load_document(store, StoreKey::WeatherHistory).unwrap_or_default();
        truncate_front(&mut history, config.history_limit);
        Self { history, config }
    }

    pub fn analyze(
        &mut self,
        snapshot: &WeatherSnapshot,
        store: &dyn PreferenceStore,
    ) -> WeatherAnalysis {
        self.analyze_at(snapshot, Local::now(), store)
    }

    /// Same as [`Self::analyze`] with an explicit local clock reading.
    pub fn analyze_at(
        &mut self,
        snapshot: &WeatherSnapshot,
        observed_at: DateTime<Local>,
        store: &dyn PreferenceStore,
    ) -> WeatherAnalysis {
        let analysis = derive_analysis(snapshot, observed_at.hour());
        self.record(observed_at.with_timezone(&Utc), analysis.clone(), store);
        analysis
    }

    pub fn history(&self) -> &[HistoricalEntry] {
        &self.history
    }

    /// Aggregates the logged analyses that fall in the same season as `now`.
    pub fn seasonal_patterns(&self, now: DateTime<Utc>) -> Option<SeasonalPattern> {
        let season = Season::from_month0(now.month0());
        let seasonal: Vec<&HistoricalEntry> = self
            .history
            .iter()
            .filter(|entry| Season::from_month0(entry.timestamp.month0()) == season)
            .collect();

        if seasonal.len() < self.config.seasonal_min_entries.max(1) {
            return None;
        }

        let count = seasonal.len() as f64;
        let avg_temperature = seasonal
            .iter()
            .map(|entry| entry.analysis.current_conditions.temperature)
            .sum::<f64>()
            / count;
        let rainy = seasonal
            .iter()
            .filter(|entry| entry.analysis.precipitation_risk.is_currently_rainy)
            .count();

        Some(SeasonalPattern {
            season,
            avg_temperature,
            rain_frequency: rainy as f64 / count,
            data_points: seasonal.len(),
        })
    }

    fn record(
        &mut self,
        timestamp: DateTime<Utc>,
        analysis: WeatherAnalysis,
        store: &dyn PreferenceStore,
    ) {
        self.history.push(HistoricalEntry { timestamp, analysis });
        truncate_front(&mut self.history, self.config.history_limit);

        if persist_or_warn(store, StoreKey::WeatherHistory, &self.history) {
            debug!(
                event_name = "weather.history.persisted",
                entries = self.history.len(),
                "weather history persisted"
            );
        }
    }
}

fn truncate_front<T>(entries: &mut Vec<T>, limit: usize) {
    if entries.len() > limit {
        let excess = entries.len() - limit;
        entries.drain(..excess);
    }
}

/// Pure derivation of an analysis from a snapshot and the local hour.
pub fn derive_analysis(snapshot: &WeatherSnapshot, hour: u32) -> WeatherAnalysis {
    WeatherAnalysis {
        current_conditions: current_conditions(&snapshot.current),
        temperature_trend: temperature_trend(snapshot),
        precipitation_risk: precipitation_risk(snapshot),
        comfort_index: comfort_index(&snapshot.current),
        weather_stability: weather_stability(&snapshot.forecast),
        time_of_day: time_of_day(hour),
    }
}

fn current_conditions(current: &CurrentWeather) -> CurrentConditions {
    let flags = ConditionFlags::from_text(&current.condition);
    let humidity = current.humidity_or_default();
    let wind_speed = current.wind_speed_or_default();

    CurrentConditions {
        temperature: current.temperature,
        feels_like: feels_like(current.temperature, humidity, wind_speed),
        temp_category: TempCategory::from_temperature(current.temperature),
        condition: current.condition.to_lowercase(),
        is_rainy: flags.rainy,
        is_snowy: flags.snowy,
        is_cloudy: flags.cloudy,
        is_sunny: flags.sunny,
        humidity,
        wind_speed,
    }
}

/// Wind chill below 10 °C, a humidity bump above 27 °C.
pub fn feels_like(temperature: f64, humidity: f64, wind_speed: f64) -> f64 {
    if temperature < 10.0 && wind_speed > 5.0 {
        return temperature - wind_speed * 0.5;
    }
    if temperature > 27.0 && humidity > 40.0 {
        return temperature + (humidity - 40.0) * 0.1;
    }
    temperature
}

fn temperature_trend(snapshot: &WeatherSnapshot) -> TemperatureTrend {
    let temps: Vec<f64> = snapshot.forecast.iter().map(|day| day.temperature).collect();

    if temps.len() < 2 {
        let reference = temps.first().copied().unwrap_or(snapshot.current.temperature);
        return TemperatureTrend {
            trend: TrendDirection::Stable,
            change: 0.0,
            volatility: Level::Low,
            min_temperature: reference,
            max_temperature: reference,
            range: 0.0,
        };
    }

    let changes: Vec<f64> = temps.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let avg_change = mean(&changes);
    let volatility = population_std_dev(&changes);

    let max_temperature = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_temperature = temps.iter().copied().fold(f64::INFINITY, f64::min);

    TemperatureTrend {
        trend: if avg_change > 2.0 {
            TrendDirection::Warming
        } else if avg_change < -2.0 {
            TrendDirection::Cooling
        } else {
            TrendDirection::Stable
        },
        change: avg_change,
        volatility: if volatility > 5.0 {
            Level::High
        } else if volatility > 2.0 {
            Level::Medium
        } else {
            Level::Low
        },
        min_temperature,
        max_temperature,
        range: max_temperature - min_temperature,
    }
}

fn precipitation_risk(snapshot: &WeatherSnapshot) -> PrecipitationRisk {
    let current = ConditionFlags::from_text(&snapshot.current.condition);
    let is_currently_rainy = current.precipitating();

    let forecast_rain_probability = if snapshot.forecast.is_empty() {
        0.0
    } else {
        let rainy_days = snapshot
            .forecast
            .iter()
            .filter(|day| ConditionFlags::from_text(&day.condition).precipitating())
            .count();
        rainy_days as f64 / snapshot.forecast.len() as f64
    };

    let current_component = if is_currently_rainy { 0.5 } else { 0.0 };
    let score = (current_component + forecast_rain_probability * 0.5).clamp(0.0, 1.0);

    PrecipitationRisk {
        level: if score > 0.6 {
            Level::High
        } else if score > 0.3 {
            Level::Medium
        } else {
            Level::Low
        },
        score,
        is_currently_rainy,
        forecast_rain_probability,
        precipitation_type: if current.snowy {
            PrecipitationType::Snow
        } else if snapshot.current.condition.to_lowercase().contains("rain") {
            PrecipitationType::Rain
        } else {
            PrecipitationType::None
        },
    }
}

fn comfort_index(current: &CurrentWeather) -> ComfortIndex {
    let temperature = current.temperature;
    let humidity = current.humidity_or_default();
    let wind_speed = current.wind_speed_or_default();

    let mut score = 50.0;
    if temperature < 10.0 {
        score -= (10.0 - temperature) * 2.0;
    } else if temperature > 28.0 {
        score -= (temperature - 28.0) * 2.0;
    }
    if humidity > 70.0 {
        score -= (humidity - 70.0) * 0.5;
    }
    if wind_speed > 20.0 {
        score -= (wind_speed - 20.0) * 0.3;
    }
    let score: f64 = score.clamp(0.0, 100.0);

    ComfortIndex {
        score,
        level: if score > 70.0 {
            ComfortLevel::Comfortable
        } else if score > 40.0 {
            ComfortLevel::Moderate
        } else {
            ComfortLevel::Uncomfortable
        },
        factors: ComfortFactors {
            temperature: if temperature > 18.0 && temperature < 26.0 {
                FactorRating::Ideal
            } else {
                FactorRating::Suboptimal
            },
            humidity: if humidity > 30.0 && humidity < 60.0 {
                FactorRating::Ideal
            } else {
                FactorRating::Suboptimal
            },
            wind: if wind_speed < 15.0 { WindRating::Calm } else { WindRating::Breezy },
        },
    }
}

fn weather_stability(forecast: &[ForecastDay]) -> WeatherStability {
    if forecast.len() < 2 {
        return WeatherStability::default();
    }

    let mut distinct: Vec<&str> = forecast.iter().map(|day| day.condition.as_str()).collect();
    distinct.sort_unstable();
    distinct.dedup();
    let score = 1.0 - distinct.len() as f64 / forecast.len() as f64;

    WeatherStability {
        stable: score > 0.6,
        score,
        level: if score > 0.7 {
            StabilityLevel::VeryStable
        } else if score > 0.4 {
            StabilityLevel::ModeratelyStable
        } else {
            StabilityLevel::Unstable
        },
    }
}

fn time_of_day(hour: u32) -> TimeOfDay {
    TimeOfDay {
        hour,
        period: DayPeriod::from_hour(hour),
        is_work_hours: (9..17).contains(&hour),
        needs_all_day_gear: hour < 10,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let variance = values.iter().map(|value| (value - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
