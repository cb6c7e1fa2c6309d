//! Feedback-driven preference learning
//!
//! Every feedback event nudges the learned weight for the observed
//! (category, temperature bucket, rain) key, its two neighbouring buckets,
//! and the category and item preferences on the user profile. All values stay
//! within [0, 2].

mod learner;
mod types;

pub use learner::PreferenceLearner;
pub use types::*;

/// Step size applied to every reward
pub const LEARNING_RATE: f64 = 0.1;

/// Share of the reward (already halved) that reaches the ±1 neighbouring buckets
pub const NEIGHBOR_DECAY: f64 = 0.5;

/// Share of the reward applied to neighbours before decay
pub const NEIGHBOR_REWARD_SCALE: f64 = 0.5;

/// Share of the reward applied to the category preference
pub const CATEGORY_REWARD_SCALE: f64 = 0.5;

/// Trimmed feedback records kept on the profile
pub const PROFILE_HISTORY_LIMIT: usize = 200;

/// Feedback entries required before insights are computed
pub const INSIGHT_MIN_FEEDBACK: usize = 10;

/// Most recent entries examined for the weather-pattern insight
pub const PATTERN_WINDOW: usize = 50;

/// Entries per temperature side required for a weather-pattern insight
pub const PATTERN_MIN_ENTRIES: usize = 5;

/// Positive share above which a weather-pattern insight is reported
pub const PATTERN_POSITIVE_RATIO: f64 = 0.7;

/// Below this temperature (°C) feedback counts as cold-weather feedback
pub const COLD_PATTERN_CEILING: f64 = 10.0;

/// Above this temperature (°C) feedback counts as warm-weather feedback
pub const WARM_PATTERN_FLOOR: f64 = 20.0;

pub const LOVED_ITEM_THRESHOLD: f64 = 1.3;
pub const AVOIDED_ITEM_THRESHOLD: f64 = 0.7;
pub const MAX_LISTED_ITEMS: usize = 5;
pub const TOP_CATEGORY_COUNT: usize = 3;
