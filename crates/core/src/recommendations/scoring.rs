//! Scoring algorithms for clothing recommendations

use std::collections::BTreeMap;

use super::types::*;
use super::{
    HAZARD_CONFIDENCE_BOOST, HIGH_PRIORITY_THRESHOLD, MAX_PER_CATEGORY, MIN_SELECTION_PRIORITY,
    RAIN_RISK_THRESHOLD, REASONING_SEPARATOR, VOLATILITY_CONFIDENCE_DISCOUNT,
};
use crate::weather::{ComfortLevel, TempCategory, TrendDirection, WeatherAnalysis};

/// Weights for the personalization blend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalizationWeights {
    /// Weight for the rule-table priority (default: 0.40)
    pub base_priority: f64,
    /// Weight for the category preference (default: 0.30)
    pub category_preference: f64,
    /// Weight for the item preference (default: 0.20)
    pub item_preference: f64,
    /// Weight for the learned weight (default: 0.10)
    pub learned_weight: f64,
}

impl Default for PersonalizationWeights {
    fn default() -> Self {
        super::DEFAULT_PERSONALIZATION_WEIGHTS
    }
}

/// A candidate after personalization, before selection
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub adjusted_priority: f64,
    pub personalization_score: f64,
}

/// Score calculator for clothing recommendations
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: PersonalizationWeights,
}

pub fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self { weights: PersonalizationWeights::default() }
    }

    pub fn with_weights(weights: PersonalizationWeights) -> Self {
        Self { weights }
    }

    /// Blend base priority, preferences and the learned weight, then squash into (0, 1).
    pub fn personalize(
        &self,
        candidate: Candidate,
        features: &FeatureVector,
        state: &PersonalizationState,
    ) -> ScoredCandidate {
        let category_preference = state.profile.category_preference(candidate.category);
        let item_preference = state.profile.item_preference(&candidate.item);
        let learned_weight = state.weights.get(&features.weight_key(candidate.category));

        let adjusted_priority = sigmoid(
            candidate.priority * self.weights.base_priority
                + category_preference * self.weights.category_preference
                + item_preference * self.weights.item_preference
                + learned_weight * self.weights.learned_weight,
        );

        ScoredCandidate { candidate, adjusted_priority, personalization_score: item_preference }
    }

    /// Up to [`MAX_PER_CATEGORY`] per category in priority order, then every
    /// remaining high-priority candidate in original order.
    pub fn rank(&self, scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        let mut grouped: BTreeMap<ClothingCategory, Vec<usize>> = BTreeMap::new();
        for (index, entry) in scored.iter().enumerate() {
            grouped.entry(entry.candidate.category).or_default().push(index);
        }
        for indices in grouped.values_mut() {
            // sort_by is stable, so equal scores keep their rule-table order
            indices.sort_by(|a, b| {
                scored[*b]
                    .adjusted_priority
                    .partial_cmp(&scored[*a].adjusted_priority)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        let mut selected: Vec<usize> = Vec::new();
        for category in ClothingCategory::PRIORITY_ORDER {
            let Some(indices) = grouped.get(&category) else {
                continue;
            };
            selected.extend(
                indices
                    .iter()
                    .take(MAX_PER_CATEGORY)
                    .filter(|index| scored[**index].adjusted_priority > MIN_SELECTION_PRIORITY),
            );
        }

        for (index, entry) in scored.iter().enumerate() {
            if !selected.contains(&index) && entry.adjusted_priority > HIGH_PRIORITY_THRESHOLD {
                selected.push(index);
            }
        }

        let mut slots: Vec<Option<ScoredCandidate>> = scored.into_iter().map(Some).collect();
        selected.into_iter().filter_map(|index| slots[index].take()).collect()
    }

    /// Integer confidence in [0, 100].
    pub fn confidence(&self, scored: &ScoredCandidate, features: &FeatureVector) -> u8 {
        let item = scored.candidate.item.to_lowercase();
        let mut confidence = scored.adjusted_priority;

        if (features.rainy() && item.contains("waterproof"))
            || (features.snowy() && item.contains("winter"))
        {
            confidence = (confidence * HAZARD_CONFIDENCE_BOOST).min(1.0);
        }
        if features.temp_volatility > 0.7 {
            confidence *= VOLATILITY_CONFIDENCE_DISCOUNT;
        }

        (confidence * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Human-readable explanation joined with [`REASONING_SEPARATOR`].
    pub fn generate_reasoning(&self, analysis: &WeatherAnalysis) -> String {
        let current = &analysis.current_conditions;
        let mut reasons: Vec<String> = Vec::new();

        match current.temp_category {
            TempCategory::Freezing | TempCategory::VeryCold => reasons.push(format!(
                "Temperature is {}°C - very cold protection needed",
                current.temperature
            )),
            TempCategory::VeryHot => reasons.push(format!(
                "Temperature is {}°C - light, breathable clothing recommended",
                current.temperature
            )),
            _ => {}
        }

        let precipitation = &analysis.precipitation_risk;
        if precipitation.is_currently_rainy {
            reasons.push("Rain expected - waterproof protection essential".to_string());
        } else if precipitation.score > RAIN_RISK_THRESHOLD {
            reasons.push(format!(
                "{}% chance of precipitation later",
                (precipitation.score * 100.0).round()
            ));
        }

        if current.is_sunny && current.temperature > 20.0 {
            reasons.push("Sunny weather - sun protection recommended".to_string());
        }

        match analysis.temperature_trend.trend {
            TrendDirection::Warming => {
                reasons.push("Temperature rising - consider layering options".to_string())
            }
            TrendDirection::Cooling => {
                reasons.push("Temperature dropping - bring warmer layers".to_string())
            }
            TrendDirection::Stable => {}
        }

        if analysis.comfort_index.level == ComfortLevel::Uncomfortable {
            reasons.push("Uncomfortable conditions - extra protection advisable".to_string());
        }

        if reasons.is_empty() {
            reasons.push("Optimal for current weather conditions".to_string());
        }

        reasons.join(REASONING_SEPARATOR)
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}
