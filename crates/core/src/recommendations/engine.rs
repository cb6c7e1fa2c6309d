//! Recommendation engine implementation

use super::rules::{base_candidates, ClothingCatalog};
use super::scoring::ScoreCalculator;
use super::types::*;
use crate::learning::PROFILE_HISTORY_LIMIT;
use crate::store::{load_document, persist_or_warn, PreferenceStore, StoreKey};
use crate::weather::WeatherAnalysis;

/// Generates personalized recommendations from a weather analysis.
///
/// The engine owns the [`PersonalizationState`] that feedback mutates; the
/// learner borrows it through [`RecommendationEngine::state_mut`].
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: ClothingCatalog,
    calculator: ScoreCalculator,
    state: PersonalizationState,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::with_state(PersonalizationState::default())
    }

    pub fn with_state(state: PersonalizationState) -> Self {
        Self { catalog: ClothingCatalog::default(), calculator: ScoreCalculator::new(), state }
    }

    /// Engine seeded from the store. Missing or corrupt documents start empty.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let weights: ModelWeights = load_document(store, StoreKey::ModelWeights).unwrap_or_default();
        let profile = load_document::<UserProfile>(store, StoreKey::UserProfile)
            .unwrap_or_default()
            .sanitized(PROFILE_HISTORY_LIMIT);

        tracing::debug!(
            event_name = "recommendations.state.loaded",
            learned_weights = weights.len(),
            item_preferences = profile.item_preferences.len(),
            "personalization state loaded"
        );

        Self::with_state(PersonalizationState { profile, weights })
    }

    pub fn catalog(&self) -> &ClothingCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &PersonalizationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PersonalizationState {
        &mut self.state
    }

    /// Ranked recommendations for one analysis. Pure with respect to the
    /// engine state, so equal inputs always give equal output.
    pub fn generate_recommendations(
        &self,
        analysis: &WeatherAnalysis,
        context: &UserContext,
    ) -> Vec<Recommendation> {
        let features = FeatureVector::extract(analysis, context);

        let scored = base_candidates(&features)
            .into_iter()
            .map(|candidate| self.calculator.personalize(candidate, &features, &self.state))
            .collect();
        let ranked = self.calculator.rank(scored);
        let reasoning = self.calculator.generate_reasoning(analysis);

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .map(|entry| {
                let confidence = self.calculator.confidence(&entry, &features);
                Recommendation {
                    category: entry.candidate.category,
                    item: entry.candidate.item,
                    priority: entry.candidate.priority,
                    layer_index: entry.candidate.layer_index,
                    adjusted_priority: entry.adjusted_priority,
                    personalization_score: entry.personalization_score,
                    confidence,
                    reasoning: reasoning.clone(),
                }
            })
            .collect();

        tracing::debug!(
            event_name = "recommendations.generated",
            count = recommendations.len(),
            temperature = analysis.current_conditions.temperature,
            "recommendations generated"
        );

        recommendations
    }

    /// Writes weights and profile. Returns whether both writes landed.
    pub fn persist(&self, store: &dyn PreferenceStore) -> bool {
        let weights = persist_or_warn(store, StoreKey::ModelWeights, &self.state.weights);
        let profile = persist_or_warn(store, StoreKey::UserProfile, &self.state.profile);
        weights && profile
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::FailingStore;
    use crate::store::InMemoryStore;
    use crate::weather::{derive_analysis, CurrentWeather, ForecastDay, WeatherSnapshot};

    fn snapshot(temperature: f64, condition: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            location: "Oslo".to_string(),
            current: CurrentWeather {
                temperature,
                high: None,
                low: None,
                condition: condition.to_string(),
                humidity: None,
                wind_speed: None,
            },
            forecast: ["Mon", "Tue", "Wed", "Thu"]
                .into_iter()
                .map(|day| ForecastDay {
                    day: day.to_string(),
                    temperature,
                    condition: condition.to_string(),
                })
                .collect(),
        }
    }

    fn items(recommendations: &[Recommendation]) -> Vec<&str> {
        recommendations.iter().map(|rec| rec.item.as_str()).collect()
    }

    #[test]
    fn snowy_morning_recommends_winter_gear() {
        let engine = RecommendationEngine::new();
        let analysis = derive_analysis(&snapshot(2.0, "Snow"), 8);

        let recommendations = engine.generate_recommendations(&analysis, &UserContext::default());
        let names = items(&recommendations);

        for expected in ["Heavy winter coat", "Winter hat", "Insulated gloves", "Winter boots"] {
            assert!(names.contains(&expected), "missing {expected} in {names:?}");
        }
        assert!(recommendations[0].reasoning.starts_with("Temperature is 2°C - very cold"));
    }

    #[test]
    fn hot_clear_afternoon_recommends_light_clothing() {
        let engine = RecommendationEngine::new();
        let analysis = derive_analysis(&snapshot(32.0, "Clear"), 14);

        let recommendations = engine.generate_recommendations(&analysis, &UserContext::default());
        let names = items(&recommendations);

        for expected in ["Tank top or light shirt", "Shorts", "Sunglasses", "Sun hat", "Sunscreen"] {
            assert!(names.contains(&expected), "missing {expected} in {names:?}");
        }
    }

    #[test]
    fn every_recommendation_is_within_bounds() {
        let engine = RecommendationEngine::new();
        for (temperature, condition) in
            [(-12.0, "Heavy snow"), (7.0, "Drizzle"), (18.0, "Cloudy"), (41.0, "Sunny")]
        {
            let analysis = derive_analysis(&snapshot(temperature, condition), 12);
            for rec in engine.generate_recommendations(&analysis, &UserContext::default()) {
                assert!(rec.adjusted_priority > 0.0 && rec.adjusted_priority < 1.0);
                assert!(rec.confidence <= 100);
                assert!(!rec.reasoning.is_empty());
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let engine = RecommendationEngine::new();
        let analysis = derive_analysis(&snapshot(9.0, "Light rain"), 9);
        let context = UserContext { activity_level: Some(0.8), style_preference: None };

        assert_eq!(
            engine.generate_recommendations(&analysis, &context),
            engine.generate_recommendations(&analysis, &context)
        );
    }

    #[test]
    fn learned_preferences_shift_adjusted_priority() {
        let analysis = derive_analysis(&snapshot(22.0, "Cloudy"), 12);
        let baseline = RecommendationEngine::new()
            .generate_recommendations(&analysis, &UserContext::default());

        let mut state = PersonalizationState::default();
        state.profile.adjust_item("T-shirt", 1.0);
        let personalized = RecommendationEngine::with_state(state)
            .generate_recommendations(&analysis, &UserContext::default());

        let score = |recs: &[Recommendation]| {
            recs.iter().find(|rec| rec.item == "T-shirt").map(|rec| rec.adjusted_priority)
        };
        assert!(score(&personalized) > score(&baseline));
        assert_eq!(
            personalized.iter().find(|rec| rec.item == "T-shirt").map(|rec| rec.personalization_score),
            Some(2.0)
        );
    }

    #[test]
    fn state_survives_a_persist_and_reload() {
        let store = InMemoryStore::new();
        let mut engine = RecommendationEngine::new();
        engine.state_mut().profile.adjust_category(ClothingCategory::Head, 0.25);
        engine.state_mut().weights.set(WeightKey::new(ClothingCategory::Head, 1, false), 1.4);

        assert!(engine.persist(&store));
        let reloaded = RecommendationEngine::load(&store);

        assert_eq!(reloaded.state(), engine.state());
    }

    #[test]
    fn unreadable_store_yields_default_state() {
        let engine = RecommendationEngine::load(&FailingStore);
        assert_eq!(engine.state(), &PersonalizationState::default());
        assert!(!engine.persist(&FailingStore));
    }

    #[test]
    fn corrupt_documents_yield_default_state() {
        let store = InMemoryStore::new()
            .with_document(StoreKey::ModelWeights, "[1, 2")
            .with_document(StoreKey::UserProfile, "null");

        let engine = RecommendationEngine::load(&store);
        assert_eq!(engine.state(), &PersonalizationState::default());
    }
}
