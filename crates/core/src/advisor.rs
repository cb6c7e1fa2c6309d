//! Single entry point wiring analysis, recommendation, learning and outfit
//! mapping around one injected store.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::learning::{
    FeedbackEntry, FeedbackKind, ImportSummary, PersonalizedInsights, PreferenceLearner,
    SessionAnalytics, UserDataExport, UserDataImport, WeatherContext,
};
use crate::outfit::{map_to_outfit, OutfitDescriptor};
use crate::recommendations::{PersonalizationState, Recommendation, RecommendationEngine, UserContext};
use crate::store::PreferenceStore;
use crate::weather::{SeasonalPattern, WeatherAnalysis, WeatherAnalyzer, WeatherSnapshot};

/// Result of one end-to-end `recommend` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub location: String,
    pub analysis: WeatherAnalysis,
    pub recommendations: Vec<Recommendation>,
    pub outfit: OutfitDescriptor,
}

pub struct OutfitAdvisor<S: PreferenceStore> {
    store: S,
    analyzer: WeatherAnalyzer,
    engine: RecommendationEngine,
    learner: PreferenceLearner,
}

impl<S: PreferenceStore> OutfitAdvisor<S> {
    /// Loads every component's state from `store`.
    pub fn open(store: S, config: &AppConfig) -> Self {
        let analyzer = WeatherAnalyzer::load(&store, config.analysis.clone());
        let engine = RecommendationEngine::load(&store);
        let learner = PreferenceLearner::load(&store, config.learning.clone());

        tracing::debug!(
            event_name = "advisor.open",
            weather_history = analyzer.history().len(),
            feedback_history = learner.history().len(),
            "outfit advisor ready"
        );

        Self { store, analyzer, engine, learner }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &PersonalizationState {
        self.engine.state()
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn weather_history_len(&self) -> usize {
        self.analyzer.history().len()
    }

    pub fn feedback_history(&self) -> &[FeedbackEntry] {
        self.learner.history()
    }

    pub fn analyze(&mut self, snapshot: &WeatherSnapshot) -> WeatherAnalysis {
        self.analyzer.analyze(snapshot, &self.store)
    }

    pub fn analyze_at(&mut self, snapshot: &WeatherSnapshot, observed_at: DateTime<Local>) -> WeatherAnalysis {
        self.analyzer.analyze_at(snapshot, observed_at, &self.store)
    }

    pub fn generate_recommendations(
        &self,
        analysis: &WeatherAnalysis,
        context: &UserContext,
    ) -> Vec<Recommendation> {
        self.engine.generate_recommendations(analysis, context)
    }

    pub fn map_to_outfit(
        &self,
        recommendations: &[Recommendation],
        temperature: f64,
        condition: &str,
    ) -> OutfitDescriptor {
        map_to_outfit(recommendations, temperature, condition)
    }

    /// Analysis, recommendations and outfit for one snapshot.
    pub fn recommend(&mut self, snapshot: &WeatherSnapshot, context: &UserContext) -> RecommendationReport {
        self.recommend_at(snapshot, context, Local::now())
    }

    pub fn recommend_at(
        &mut self,
        snapshot: &WeatherSnapshot,
        context: &UserContext,
        observed_at: DateTime<Local>,
    ) -> RecommendationReport {
        let analysis = self.analyze_at(snapshot, observed_at);
        let recommendations = self.generate_recommendations(&analysis, context);
        let outfit = self.map_to_outfit(
            &recommendations,
            snapshot.current.temperature,
            &snapshot.current.condition,
        );

        RecommendationReport { location: snapshot.location.clone(), analysis, recommendations, outfit }
    }

    pub fn record_feedback(
        &mut self,
        recommendation: &Recommendation,
        kind: FeedbackKind,
        context: WeatherContext,
    ) -> FeedbackEntry {
        self.learner.record_feedback(self.engine.state_mut(), &self.store, recommendation, kind, context)
    }

    pub fn personalized_insights(&self) -> PersonalizedInsights {
        self.learner.personalized_insights(self.engine.state())
    }

    pub fn session_analytics(&self) -> Option<SessionAnalytics> {
        self.learner.session_analytics()
    }

    pub fn reset_session(&mut self) {
        self.learner.reset_session();
    }

    pub fn seasonal_patterns(&self, now: DateTime<Utc>) -> Option<SeasonalPattern> {
        self.analyzer.seasonal_patterns(now)
    }

    pub fn export_user_data(&self) -> UserDataExport {
        self.learner.export_user_data(self.engine.state())
    }

    pub fn import_user_data(&mut self, data: UserDataImport) -> ImportSummary {
        self.learner.import_user_data(self.engine.state_mut(), &self.store, data)
    }

    pub fn clear_all_data(&mut self) {
        self.learner.clear_all_data(self.engine.state_mut(), &self.store);
    }
}
