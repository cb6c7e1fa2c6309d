//! Preference learner implementation

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::*;
use super::{
    AVOIDED_ITEM_THRESHOLD, CATEGORY_REWARD_SCALE, COLD_PATTERN_CEILING, LOVED_ITEM_THRESHOLD,
    MAX_LISTED_ITEMS, NEIGHBOR_REWARD_SCALE, PATTERN_MIN_ENTRIES, PATTERN_POSITIVE_RATIO,
    PATTERN_WINDOW, TOP_CATEGORY_COUNT, WARM_PATTERN_FLOOR,
};
use crate::config::LearningConfig;
use crate::recommendations::{
    weight_key, ModelWeights, PersonalizationState, ProfileFeedback, Recommendation, UserProfile,
};
use crate::store::{load_document, persist_or_warn, PreferenceStore, StoreKey};
use crate::weather::ConditionFlags;

/// Records feedback and adapts the personalization state it is handed.
///
/// The learner owns the unbounded feedback log and the per-process session;
/// weights and profile stay with the engine and are passed in by reference.
#[derive(Debug, Clone)]
pub struct PreferenceLearner {
    config: LearningConfig,
    history: Vec<FeedbackEntry>,
    session: Vec<FeedbackEntry>,
    session_id: String,
}

impl PreferenceLearner {
    pub fn new(config: LearningConfig) -> Self {
        Self::with_history(config, Vec::new())
    }

    fn with_history(config: LearningConfig, history: Vec<FeedbackEntry>) -> Self {
        Self {
            config,
            history,
            session: Vec::new(),
            session_id: format!("session_{}", Uuid::new_v4().simple()),
        }
    }

    /// Learner seeded from the stored feedback log. An unreadable log starts empty.
    pub fn load(store: &dyn PreferenceStore, config: LearningConfig) -> Self {
        let history: Vec<FeedbackEntry> =
            load_document(store, StoreKey::FeedbackHistory).unwrap_or_default();
        Self::with_history(config, history)
    }

    pub fn history(&self) -> &[FeedbackEntry] {
        &self.history
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn record_feedback(
        &mut self,
        state: &mut PersonalizationState,
        store: &dyn PreferenceStore,
        recommendation: &Recommendation,
        kind: FeedbackKind,
        context: WeatherContext,
    ) -> FeedbackEntry {
        self.record_feedback_at(state, store, recommendation, kind, context, Utc::now())
    }

    /// [`Self::record_feedback`] with an explicit timestamp.
    pub fn record_feedback_at(
        &mut self,
        state: &mut PersonalizationState,
        store: &dyn PreferenceStore,
        recommendation: &Recommendation,
        kind: FeedbackKind,
        context: WeatherContext,
        timestamp: DateTime<Utc>,
    ) -> FeedbackEntry {
        let entry = FeedbackEntry {
            timestamp,
            recommendation: RecommendationSnapshot::from(recommendation),
            feedback: kind,
            weather_context: context,
            session_id: self.session_id.clone(),
        };

        self.history.push(entry.clone());
        self.session.push(entry.clone());

        self.update_weights(&mut state.weights, &entry);
        self.update_profile(&mut state.profile, &entry);

        persist_or_warn(store, StoreKey::FeedbackHistory, &self.history);
        persist_or_warn(store, StoreKey::ModelWeights, &state.weights);
        persist_or_warn(store, StoreKey::UserProfile, &state.profile);

        tracing::debug!(
            event_name = "learning.feedback.recorded",
            item = %entry.recommendation.item,
            feedback = %kind,
            history_len = self.history.len(),
            "feedback recorded"
        );

        entry
    }

    fn update_weights(&self, weights: &mut ModelWeights, entry: &FeedbackEntry) {
        let reward = entry.feedback.reward();
        let context = &entry.weather_context;
        let rainy = ConditionFlags::from_text(&context.condition).rainy;
        let key = weight_key(entry.recommendation.category, context.temperature, rainy);

        weights.adjust(key, self.config.learning_rate * reward);

        let neighbour_delta =
            self.config.learning_rate * (reward * NEIGHBOR_REWARD_SCALE) * self.config.neighbor_decay;
        for offset in [-1, 1] {
            weights.adjust(key.shifted(offset), neighbour_delta);
        }
    }

    fn update_profile(&self, profile: &mut UserProfile, entry: &FeedbackEntry) {
        let reward = entry.feedback.reward();
        let snapshot = &entry.recommendation;

        profile.adjust_category(
            snapshot.category,
            self.config.learning_rate * reward * CATEGORY_REWARD_SCALE,
        );
        profile.adjust_item(&snapshot.item, self.config.learning_rate * reward);
        profile.push_feedback(
            ProfileFeedback {
                timestamp: entry.timestamp,
                item: snapshot.item.clone(),
                feedback: entry.feedback,
            },
            self.config.profile_history_limit,
        );
    }

    pub fn personalized_insights(&self, state: &PersonalizationState) -> PersonalizedInsights {
        let data_points = self.history.len();
        if data_points < self.config.insight_min_feedback {
            return PersonalizedInsights {
                data_points,
                message: "Keep providing feedback to get personalized insights!".to_string(),
                insights: Vec::new(),
                learning_progress: None,
            };
        }

        let profile = &state.profile;
        let mut insights = Vec::new();

        let mut categories: Vec<_> = profile.category_preferences.iter().collect();
        // BTreeMap order breaks score ties by name
        categories.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
        if !categories.is_empty() {
            let description = categories
                .iter()
                .take(TOP_CATEGORY_COUNT)
                .map(|(category, score)| {
                    format!("{category} ({}% preference)", (**score * 50.0).round())
                })
                .collect::<Vec<_>>()
                .join(", ");
            insights.push(Insight {
                kind: InsightKind::Preference,
                title: "Your Favorite Categories".to_string(),
                description,
            });
        }

        let loved = items_where(profile, |score| score > LOVED_ITEM_THRESHOLD);
        if !loved.is_empty() {
            insights.push(Insight {
                kind: InsightKind::Loved,
                title: "Items You Love".to_string(),
                description: loved.join(", "),
            });
        }

        let avoided = items_where(profile, |score| score < AVOIDED_ITEM_THRESHOLD);
        if !avoided.is_empty() {
            insights.push(Insight {
                kind: InsightKind::Disliked,
                title: "Items You Avoid".to_string(),
                description: avoided.join(", "),
            });
        }

        if let Some(pattern) = self.weather_pattern() {
            insights.push(pattern);
        }

        PersonalizedInsights {
            data_points,
            message: format!("We've learned from {data_points} of your feedback entries!"),
            insights,
            learning_progress: Some(LearningProgress::from_feedback_count(data_points)),
        }
    }

    fn weather_pattern(&self) -> Option<Insight> {
        let start = self.history.len().saturating_sub(PATTERN_WINDOW);
        let recent = &self.history[start..];

        let positive_share = |matching: &[&FeedbackEntry]| -> Option<f64> {
            if matching.len() < PATTERN_MIN_ENTRIES {
                return None;
            }
            let positive = matching.iter().filter(|entry| entry.feedback.is_positive()).count();
            Some(positive as f64 / matching.len() as f64)
        };

        let cold: Vec<_> = recent
            .iter()
            .filter(|entry| entry.weather_context.temperature < COLD_PATTERN_CEILING)
            .collect();
        if positive_share(cold.as_slice()).is_some_and(|share| share > PATTERN_POSITIVE_RATIO) {
            return Some(Insight {
                kind: InsightKind::WeatherPattern,
                title: "Cold Weather Preference".to_string(),
                description: "You seem to appreciate our cold weather recommendations!".to_string(),
            });
        }

        let warm: Vec<_> = recent
            .iter()
            .filter(|entry| entry.weather_context.temperature > WARM_PATTERN_FLOOR)
            .collect();
        if positive_share(warm.as_slice()).is_some_and(|share| share > PATTERN_POSITIVE_RATIO) {
            return Some(Insight {
                kind: InsightKind::WeatherPattern,
                title: "Warm Weather Preference".to_string(),
                description: "You love our warm weather recommendations!".to_string(),
            });
        }

        None
    }

    /// `None` until feedback has been recorded in this session.
    pub fn session_analytics(&self) -> Option<SessionAnalytics> {
        let total = self.session.len();
        if total == 0 {
            return None;
        }

        let liked = self.session.iter().filter(|entry| entry.feedback.is_positive()).count();
        let disliked = self.session.iter().filter(|entry| entry.feedback.is_negative()).count();

        Some(SessionAnalytics {
            total_recommendations: total,
            liked,
            disliked,
            ignored: total - liked - disliked,
            satisfaction_rate: liked as f64 / total as f64,
        })
    }

    pub fn reset_session(&mut self) {
        self.session.clear();
    }

    pub fn export_user_data(&self, state: &PersonalizationState) -> UserDataExport {
        UserDataExport {
            feedback_history: self.history.clone(),
            user_profile: state.profile.clone(),
            model_weights: state.weights.clone(),
            export_date: Utc::now(),
            data_points: self.history.len(),
        }
    }

    /// Replaces each part present in `data` and persists it. Profile and
    /// weights are brought back into range first.
    pub fn import_user_data(
        &mut self,
        state: &mut PersonalizationState,
        store: &dyn PreferenceStore,
        data: UserDataImport,
    ) -> ImportSummary {
        if let Some(history) = data.feedback_history {
            self.history = history;
            persist_or_warn(store, StoreKey::FeedbackHistory, &self.history);
        }
        if let Some(profile) = data.user_profile {
            state.profile = profile.sanitized(self.config.profile_history_limit);
            persist_or_warn(store, StoreKey::UserProfile, &state.profile);
        }
        if let Some(weights) = data.model_weights {
            state.weights = weights.iter().map(|(key, value)| (*key, *value)).collect();
            persist_or_warn(store, StoreKey::ModelWeights, &state.weights);
        }

        tracing::info!(
            event_name = "learning.data.imported",
            data_points = self.history.len(),
            "user data imported"
        );

        ImportSummary { success: true, data_points: self.history.len() }
    }

    /// Resets feedback log, session, profile and weights, then persists the empty state.
    pub fn clear_all_data(&mut self, state: &mut PersonalizationState, store: &dyn PreferenceStore) {
        self.history.clear();
        self.session.clear();
        *state = PersonalizationState::default();

        persist_or_warn(store, StoreKey::FeedbackHistory, &self.history);
        persist_or_warn(store, StoreKey::UserProfile, &state.profile);
        persist_or_warn(store, StoreKey::ModelWeights, &state.weights);

        tracing::info!(event_name = "learning.data.cleared", "all learning data cleared");
    }
}

impl Default for PreferenceLearner {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}

fn items_where(profile: &UserProfile, predicate: impl Fn(f64) -> bool) -> Vec<&str> {
    profile
        .item_preferences
        .iter()
        .filter(|(_, score)| predicate(**score))
        .map(|(item, _)| item.as_str())
        .take(MAX_LISTED_ITEMS)
        .collect()
}
