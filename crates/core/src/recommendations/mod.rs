//! Clothing recommendation engine
//!
//! Turns a weather analysis into a ranked, explained set of garments. Rule
//! tables propose candidates, learned weights and the user profile personalize
//! them, and the ranking keeps the selection diverse across categories.

mod engine;
mod features;
mod rules;
mod scoring;
mod types;

pub use engine::RecommendationEngine;
pub use features::{denormalize_temperature, normalize_temperature, temperature_bucket, weight_key};
pub use rules::{base_candidates, ClothingCatalog};
pub use scoring::{sigmoid, PersonalizationWeights, ScoreCalculator, ScoredCandidate};
pub use types::*;

/// Default personalization blend
pub const DEFAULT_PERSONALIZATION_WEIGHTS: PersonalizationWeights = PersonalizationWeights {
    base_priority: 0.40,
    category_preference: 0.30,
    item_preference: 0.20,
    learned_weight: 0.10,
};

/// Adjusted priority a candidate must exceed to be picked per category
pub const MIN_SELECTION_PRIORITY: f64 = 0.3;

/// Adjusted priority above which a candidate is kept regardless of category caps
pub const HIGH_PRIORITY_THRESHOLD: f64 = 0.7;

/// Maximum recommendations per category before the high-priority sweep
pub const MAX_PER_CATEGORY: usize = 2;

pub const WEIGHT_MIN: f64 = 0.0;
pub const WEIGHT_MAX: f64 = 2.0;

/// Value of any preference or learned weight that has never been set
pub const DEFAULT_PREFERENCE: f64 = 1.0;

/// Activity level and style preference assumed when the caller omits them
pub const DEFAULT_CONTEXT_LEVEL: f64 = 0.5;

pub const HAZARD_CONFIDENCE_BOOST: f64 = 1.2;
pub const VOLATILITY_CONFIDENCE_DISCOUNT: f64 = 0.9;

pub const REASONING_SEPARATOR: &str = " • ";

/// Precipitation score above which rain gear and the forecast note appear
pub const RAIN_RISK_THRESHOLD: f64 = 0.4;

/// Normalized wind speed above which a windbreaker is proposed
pub const WIND_FEATURE_THRESHOLD: f64 = 0.4;
