//! Types for the recommendation engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_PREFERENCE, WEIGHT_MAX, WEIGHT_MIN};
use crate::learning::FeedbackKind;

/// Garment slot a recommendation fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingCategory {
    Outerwear,
    Top,
    Bottom,
    Feet,
    Head,
    Hands,
    Accessories,
}

impl ClothingCategory {
    /// Selection order used when ranking
    pub const PRIORITY_ORDER: [ClothingCategory; 7] = [
        ClothingCategory::Outerwear,
        ClothingCategory::Top,
        ClothingCategory::Bottom,
        ClothingCategory::Feet,
        ClothingCategory::Head,
        ClothingCategory::Hands,
        ClothingCategory::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingCategory::Outerwear => "outerwear",
            ClothingCategory::Top => "top",
            ClothingCategory::Bottom => "bottom",
            ClothingCategory::Feet => "feet",
            ClothingCategory::Head => "head",
            ClothingCategory::Hands => "hands",
            ClothingCategory::Accessories => "accessories",
        }
    }
}

impl fmt::Display for ClothingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClothingCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::PRIORITY_ORDER
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown clothing category `{value}` \
                     (expected outerwear|top|bottom|feet|head|hands|accessories)"
                )
            })
    }
}

/// Optional caller-supplied context; absent values count as 0.5
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserContext {
    pub activity_level: Option<f64>,
    pub style_preference: Option<f64>,
}

/// Normalized encoding of an analysis, every field in [0,1] or [-1,1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_category: f64,
    pub temp_trend: f64,
    pub temp_volatility: f64,
    pub is_rainy: f64,
    pub is_snowy: f64,
    pub is_sunny: f64,
    pub is_cloudy: f64,
    pub precip_risk: f64,
    pub precip_level: f64,
    pub comfort_score: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub time_of_day: f64,
    pub is_work_hours: f64,
    pub needs_all_day_gear: f64,
    pub activity_level: f64,
    pub style_preference: f64,
}

impl FeatureVector {
    pub fn rainy(&self) -> bool {
        self.is_rainy > 0.5
    }

    pub fn snowy(&self) -> bool {
        self.is_snowy > 0.5
    }

    pub fn sunny(&self) -> bool {
        self.is_sunny > 0.5
    }
}

/// Composite key addressing one learned weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeightKey {
    pub category: ClothingCategory,
    pub temperature_bucket: i32,
    pub rainy: bool,
}

impl WeightKey {
    pub fn new(category: ClothingCategory, temperature_bucket: i32, rainy: bool) -> Self {
        Self { category, temperature_bucket, rainy }
    }

    /// Same category and rain flag, bucket shifted by `offset`
    pub fn shifted(&self, offset: i32) -> Self {
        Self { temperature_bucket: self.temperature_bucket + offset, ..*self }
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.category, self.temperature_bucket, u8::from(self.rainy))
    }
}

impl FromStr for WeightKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.rsplitn(3, '_');
        let (Some(rainy), Some(bucket), Some(category)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("malformed weight key `{value}`"));
        };

        let rainy = match rainy {
            "1" | "true" => true,
            "0" | "false" => false,
            other => return Err(format!("malformed rain flag `{other}` in `{value}`")),
        };
        let temperature_bucket = bucket
            .parse::<i32>()
            .map_err(|_| format!("malformed temperature bucket `{bucket}` in `{value}`"))?;

        Ok(Self { category: category.parse()?, temperature_bucket, rainy })
    }
}

pub(crate) fn clamp_weight(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_PREFERENCE;
    }
    value.clamp(WEIGHT_MIN, WEIGHT_MAX)
}

/// Learned multipliers, each held in [0, 2]. Absent keys read as 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelWeights {
    weights: BTreeMap<WeightKey, f64>,
}

impl ModelWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &WeightKey) -> f64 {
        self.weights.get(key).copied().unwrap_or(DEFAULT_PREFERENCE)
    }

    pub fn contains(&self, key: &WeightKey) -> bool {
        self.weights.contains_key(key)
    }

    /// Stores `value` clamped into range and returns what was stored.
    pub fn set(&mut self, key: WeightKey, value: f64) -> f64 {
        let clamped = clamp_weight(value);
        self.weights.insert(key, clamped);
        clamped
    }

    pub fn adjust(&mut self, key: WeightKey, delta: f64) -> f64 {
        let current = self.get(&key);
        self.set(key, current + delta)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeightKey, &f64)> {
        self.weights.iter()
    }
}

impl FromIterator<(WeightKey, f64)> for ModelWeights {
    fn from_iter<I: IntoIterator<Item = (WeightKey, f64)>>(iter: I) -> Self {
        let mut weights = ModelWeights::new();
        for (key, value) in iter {
            weights.set(key, value);
        }
        weights
    }
}

impl Serialize for ModelWeights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.weights.len()))?;
        for (key, value) in &self.weights {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ModelWeights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WeightsVisitor;

        impl<'de> Visitor<'de> for WeightsVisitor {
            type Value = ModelWeights;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of `category_bucket_rainflag` keys to numeric weights")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut weights = ModelWeights::new();
                while let Some((raw_key, value)) = access.next_entry::<String, f64>()? {
                    match raw_key.parse::<WeightKey>() {
                        Ok(key) => {
                            weights.set(key, value);
                        }
                        Err(reason) => {
                            tracing::warn!(
                                event_name = "recommendations.weights.key_skipped",
                                key = %raw_key,
                                reason = %reason,
                                "dropping unparsable learned weight"
                            );
                        }
                    }
                }
                Ok(weights)
            }
        }

        deserializer.deserialize_map(WeightsVisitor)
    }
}

/// Trimmed feedback record kept on the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFeedback {
    pub timestamp: DateTime<Utc>,
    pub item: String,
    pub feedback: FeedbackKind,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub category_preferences: BTreeMap<ClothingCategory, f64>,
    pub item_preferences: BTreeMap<String, f64>,
    pub feedback_history: Vec<ProfileFeedback>,
}

impl UserProfile {
    pub fn category_preference(&self, category: ClothingCategory) -> f64 {
        self.category_preferences.get(&category).copied().unwrap_or(DEFAULT_PREFERENCE)
    }

    pub fn item_preference(&self, item: &str) -> f64 {
        self.item_preferences.get(item).copied().unwrap_or(DEFAULT_PREFERENCE)
    }

    pub fn adjust_category(&mut self, category: ClothingCategory, delta: f64) -> f64 {
        let updated = clamp_weight(self.category_preference(category) + delta);
        self.category_preferences.insert(category, updated);
        updated
    }

    pub fn adjust_item(&mut self, item: &str, delta: f64) -> f64 {
        let updated = clamp_weight(self.item_preference(item) + delta);
        self.item_preferences.insert(item.to_owned(), updated);
        updated
    }

    /// Appends a record, evicting the oldest beyond `limit`.
    pub fn push_feedback(&mut self, record: ProfileFeedback, limit: usize) {
        self.feedback_history.push(record);
        if self.feedback_history.len() > limit {
            let excess = self.feedback_history.len() - limit;
            self.feedback_history.drain(..excess);
        }
    }

    /// Clamps every preference and trims the history, for data arriving from
    /// outside the update rules.
    pub fn sanitized(mut self, history_limit: usize) -> Self {
        for value in self.category_preferences.values_mut() {
            *value = clamp_weight(*value);
        }
        for value in self.item_preferences.values_mut() {
            *value = clamp_weight(*value);
        }
        if self.feedback_history.len() > history_limit {
            let excess = self.feedback_history.len() - history_limit;
            self.feedback_history.drain(..excess);
        }
        self
    }
}

/// Everything personalization reads and feedback mutates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonalizationState {
    pub profile: UserProfile,
    pub weights: ModelWeights,
}

/// Rule-table output before personalization
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub category: ClothingCategory,
    pub item: String,
    pub priority: f64,
    pub layer_index: u8,
}

/// A ranked, explained clothing suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: ClothingCategory,
    pub item: String,
    /// Rule-table priority (0.0 - 1.0)
    pub priority: f64,
    pub layer_index: u8,
    /// Post-personalization score in (0, 1)
    pub adjusted_priority: f64,
    /// Item preference applied while scoring
    pub personalization_score: f64,
    /// 0 - 100
    pub confidence: u8,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_key_round_trips_through_its_string_form() {
        let key = WeightKey::new(ClothingCategory::Outerwear, -1, true);
        assert_eq!(key.to_string(), "outerwear_-1_1");
        assert_eq!("outerwear_-1_1".parse::<WeightKey>(), Ok(key));
    }

    #[test]
    fn weight_key_rejects_garbage() {
        assert!("outerwear_x_1".parse::<WeightKey>().is_err());
        assert!("cape_2_0".parse::<WeightKey>().is_err());
        assert!("top".parse::<WeightKey>().is_err());
    }

    #[test]
    fn weights_default_to_one_and_clamp_on_write() {
        let mut weights = ModelWeights::new();
        let key = WeightKey::new(ClothingCategory::Head, 1, false);

        assert_eq!(weights.get(&key), 1.0);
        assert_eq!(weights.set(key, 5.0), 2.0);
        assert_eq!(weights.adjust(key, -9.0), 0.0);
    }

    #[test]
    fn persisted_weights_drop_bad_keys_and_clamp_values() {
        let weights: ModelWeights =
            serde_json::from_str(r#"{"head_1_0": 3.5, "bogus": 1.2, "feet_4_1": 0.4}"#)
                .expect("parse weights");

        assert_eq!(weights.len(), 2);
        assert_eq!(weights.get(&WeightKey::new(ClothingCategory::Head, 1, false)), 2.0);
        assert_eq!(weights.get(&WeightKey::new(ClothingCategory::Feet, 4, true)), 0.4);

        let json = serde_json::to_value(&weights).expect("serialize weights");
        assert_eq!(json["head_1_0"], 2.0);
    }

    #[test]
    fn profile_history_is_bounded() {
        let mut profile = UserProfile::default();
        for index in 0..5 {
            profile.push_feedback(
                ProfileFeedback {
                    timestamp: Utc::now(),
                    item: format!("item-{index}"),
                    feedback: FeedbackKind::Like,
                },
                3,
            );
        }

        let items: Vec<_> = profile.feedback_history.iter().map(|f| f.item.as_str()).collect();
        assert_eq!(items, vec!["item-2", "item-3", "item-4"]);
    }

    #[test]
    fn sanitized_profile_is_back_in_range() {
        let mut profile = UserProfile::default();
        profile.item_preferences.insert("Scarf".to_string(), -3.0);
        profile.category_preferences.insert(ClothingCategory::Top, 7.0);

        let profile = profile.sanitized(200);
        assert_eq!(profile.item_preference("Scarf"), 0.0);
        assert_eq!(profile.category_preference(ClothingCategory::Top), 2.0);
    }
}
