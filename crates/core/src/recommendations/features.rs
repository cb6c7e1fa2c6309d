//! Feature extraction

use super::types::{ClothingCategory, FeatureVector, UserContext, WeightKey};
use super::DEFAULT_CONTEXT_LEVEL;
use crate::weather::{DayPeriod, Level, TempCategory, TrendDirection, WeatherAnalysis};

/// Maps -10..40 °C onto 0..1
pub fn normalize_temperature(celsius: f64) -> f64 {
    (celsius + 10.0) / 50.0
}

/// Inverse of [`normalize_temperature`], rounded to damp float noise at band edges.
pub fn denormalize_temperature(normalized: f64) -> f64 {
    ((normalized * 50.0 - 10.0) * 1e6).round() / 1e6
}

/// Tenth of the normalized scale, i.e. 5 °C wide buckets.
pub fn temperature_bucket(normalized: f64) -> i32 {
    (normalized * 10.0).floor() as i32
}

/// Learned-weight key for a category observed at `celsius`.
pub fn weight_key(category: ClothingCategory, celsius: f64, rainy: bool) -> WeightKey {
    WeightKey::new(category, temperature_bucket(normalize_temperature(celsius)), rainy)
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn encode_level(level: Level) -> f64 {
    match level {
        Level::High => 1.0,
        Level::Medium => 0.5,
        Level::Low => 0.0,
    }
}

fn encode_trend(trend: TrendDirection) -> f64 {
    match trend {
        TrendDirection::Warming => 1.0,
        TrendDirection::Cooling => -1.0,
        TrendDirection::Stable => 0.0,
    }
}

fn encode_period(period: DayPeriod) -> f64 {
    match period {
        DayPeriod::Night => 0.0,
        DayPeriod::Morning => 0.33,
        DayPeriod::Afternoon => 0.66,
        DayPeriod::Evening => 1.0,
    }
}

impl FeatureVector {
    pub fn extract(analysis: &WeatherAnalysis, context: &UserContext) -> Self {
        let current = &analysis.current_conditions;

        Self {
            temperature: normalize_temperature(current.temperature),
            feels_like: normalize_temperature(current.feels_like),
            temp_category: current.temp_category.ordinal() as f64 / TempCategory::ALL.len() as f64,
            temp_trend: encode_trend(analysis.temperature_trend.trend),
            temp_volatility: encode_level(analysis.temperature_trend.volatility),
            is_rainy: flag(current.is_rainy),
            is_snowy: flag(current.is_snowy),
            is_sunny: flag(current.is_sunny),
            is_cloudy: flag(current.is_cloudy),
            precip_risk: analysis.precipitation_risk.score,
            precip_level: encode_level(analysis.precipitation_risk.level),
            comfort_score: analysis.comfort_index.score / 100.0,
            humidity: current.humidity / 100.0,
            wind_speed: (current.wind_speed / 50.0).min(1.0),
            time_of_day: encode_period(analysis.time_of_day.period),
            is_work_hours: flag(analysis.time_of_day.is_work_hours),
            needs_all_day_gear: flag(analysis.time_of_day.needs_all_day_gear),
            activity_level: context.activity_level.unwrap_or(DEFAULT_CONTEXT_LEVEL),
            style_preference: context.style_preference.unwrap_or(DEFAULT_CONTEXT_LEVEL),
        }
    }

    /// Temperature in °C recovered from the normalized feature
    pub fn celsius(&self) -> f64 {
        denormalize_temperature(self.temperature)
    }

    pub fn weight_key(&self, category: ClothingCategory) -> WeightKey {
        WeightKey::new(category, temperature_bucket(self.temperature), self.rainy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{CurrentConditions, WeatherAnalysis};

    #[test]
    fn temperature_normalization_round_trips() {
        for celsius in [-10.0, -2.0, 0.0, 5.0, 10.0, 25.0, 32.0] {
            assert_eq!(denormalize_temperature(normalize_temperature(celsius)), celsius);
        }
    }

    #[test]
    fn buckets_are_five_degrees_wide() {
        assert_eq!(temperature_bucket(normalize_temperature(-2.0)), 1);
        assert_eq!(temperature_bucket(normalize_temperature(0.0)), 2);
        assert_eq!(temperature_bucket(normalize_temperature(20.0)), 6);
        assert_eq!(temperature_bucket(normalize_temperature(25.0)), 7);
        assert_eq!(temperature_bucket(normalize_temperature(-15.0)), -1);
    }

    #[test]
    fn bucket_edges_fall_into_the_upper_bucket() {
        assert_eq!(weight_key(ClothingCategory::Top, -10.0, false).temperature_bucket, 0);
        assert_eq!(weight_key(ClothingCategory::Top, 4.9, false).temperature_bucket, 2);
        assert_eq!(weight_key(ClothingCategory::Top, 5.0, false).temperature_bucket, 3);
        assert_eq!(weight_key(ClothingCategory::Top, 24.9, false).temperature_bucket, 6);
        assert_eq!(weight_key(ClothingCategory::Top, 25.0, false).temperature_bucket, 7);
        assert_eq!(weight_key(ClothingCategory::Top, 40.0, false).temperature_bucket, 10);
        for whole in -10_i32..=40 {
            let celsius = f64::from(whole);
            let expected = (whole + 10).div_euclid(5);
            assert_eq!(temperature_bucket(normalize_temperature(celsius)), expected, "{celsius} °C");
        }
    }

    #[test]
    fn extraction_encodes_analysis_and_defaults_context() {
        let analysis = WeatherAnalysis {
            current_conditions: CurrentConditions {
                temperature: 15.0,
                feels_like: 15.0,
                temp_category: TempCategory::Mild,
                is_rainy: true,
                humidity: 80.0,
                wind_speed: 75.0,
                ..CurrentConditions::default()
            },
            ..WeatherAnalysis::default()
        };

        let features = FeatureVector::extract(&analysis, &UserContext::default());

        assert_eq!(features.temperature, 0.5);
        assert_eq!(features.temp_category, 0.5);
        assert_eq!(features.is_rainy, 1.0);
        assert_eq!(features.humidity, 0.8);
        assert_eq!(features.wind_speed, 1.0);
        assert_eq!(features.comfort_score, 0.5);
        assert_eq!(features.activity_level, 0.5);
        assert_eq!(features.style_preference, 0.5);
        assert_eq!(features.weight_key(ClothingCategory::Top), WeightKey::new(ClothingCategory::Top, 5, true));
    }
}
