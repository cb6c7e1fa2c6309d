pub mod advisor;
pub mod config;
pub mod errors;
pub mod learning;
pub mod outfit;
pub mod recommendations;
pub mod store;
pub mod weather;

pub use advisor::{OutfitAdvisor, RecommendationReport};
pub use errors::{ApplicationError, InterfaceError, StoreError};
pub use learning::{FeedbackEntry, FeedbackKind, PersonalizedInsights, PreferenceLearner, WeatherContext};
pub use outfit::{map_to_outfit, OutfitDescriptor};
pub use recommendations::{ClothingCategory, Recommendation, RecommendationEngine, UserContext};
pub use store::{InMemoryStore, PreferenceStore, StoreKey};
pub use weather::{WeatherAnalysis, WeatherAnalyzer, WeatherSnapshot};
