//! Types for preference learning

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommendations::{ClothingCategory, ModelWeights, Recommendation, UserProfile};
use crate::weather::DayPeriod;

/// How the user responded to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Worn,
    Like,
    Ignored,
    Dislike,
    Inappropriate,
    /// Anything unrecognised in stored data; carries no reward
    #[serde(other)]
    Unknown,
}

impl FeedbackKind {
    pub const RECOGNISED: [FeedbackKind; 5] = [
        FeedbackKind::Worn,
        FeedbackKind::Like,
        FeedbackKind::Ignored,
        FeedbackKind::Dislike,
        FeedbackKind::Inappropriate,
    ];

    pub fn reward(&self) -> f64 {
        match self {
            FeedbackKind::Worn => 1.0,
            FeedbackKind::Like => 0.5,
            FeedbackKind::Ignored => -0.2,
            FeedbackKind::Dislike => -0.5,
            FeedbackKind::Inappropriate => -1.0,
            FeedbackKind::Unknown => 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, FeedbackKind::Worn | FeedbackKind::Like)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, FeedbackKind::Dislike | FeedbackKind::Inappropriate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Worn => "worn",
            FeedbackKind::Like => "like",
            FeedbackKind::Ignored => "ignored",
            FeedbackKind::Dislike => "dislike",
            FeedbackKind::Inappropriate => "inappropriate",
            FeedbackKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::RECOGNISED.into_iter().find(|kind| kind.as_str() == normalized).ok_or_else(|| {
            format!("unknown feedback kind `{value}` (expected worn|like|ignored|dislike|inappropriate)")
        })
    }
}

/// The parts of a recommendation kept with its feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSnapshot {
    pub item: String,
    pub category: ClothingCategory,
    pub confidence: u8,
}

impl From<&Recommendation> for RecommendationSnapshot {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            item: recommendation.item.clone(),
            category: recommendation.category,
            confidence: recommendation.confidence,
        }
    }
}

/// Conditions at the moment feedback was given
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherContext {
    pub temperature: f64,
    pub condition: String,
    pub time_of_day: DayPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub timestamp: DateTime<Utc>,
    pub recommendation: RecommendationSnapshot,
    pub feedback: FeedbackKind,
    pub weather_context: WeatherContext,
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Preference,
    Loved,
    Disliked,
    WeatherPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressLevel {
    Beginner,
    Learning,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningProgress {
    pub level: ProgressLevel,
    pub percentage: u8,
}

impl LearningProgress {
    pub fn from_feedback_count(count: usize) -> Self {
        let (level, percentage) = match count {
            0..=9 => (ProgressLevel::Beginner, 10),
            10..=29 => (ProgressLevel::Learning, 30),
            30..=49 => (ProgressLevel::Intermediate, 50),
            50..=99 => (ProgressLevel::Advanced, 70),
            _ => (ProgressLevel::Expert, 90),
        };
        Self { level, percentage }
    }
}

/// Aggregated view of what has been learned so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedInsights {
    pub data_points: usize,
    pub message: String,
    pub insights: Vec<Insight>,
    /// Absent while still below the feedback threshold
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub learning_progress: Option<LearningProgress>,
}

/// Feedback tallies for the current process session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalytics {
    pub total_recommendations: usize,
    pub liked: usize,
    pub disliked: usize,
    pub ignored: usize,
    pub satisfaction_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataExport {
    pub feedback_history: Vec<FeedbackEntry>,
    pub user_profile: UserProfile,
    pub model_weights: ModelWeights,
    pub export_date: DateTime<Utc>,
    pub data_points: usize,
}

/// Any subset of a previous export. Parts left out stay untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDataImport {
    pub feedback_history: Option<Vec<FeedbackEntry>>,
    pub user_profile: Option<UserProfile>,
    pub model_weights: Option<ModelWeights>,
}

impl From<UserDataExport> for UserDataImport {
    fn from(export: UserDataExport) -> Self {
        Self {
            feedback_history: Some(export.feedback_history),
            user_profile: Some(export.user_profile),
            model_weights: Some(export.model_weights),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub success: bool,
    pub data_points: usize,
}
