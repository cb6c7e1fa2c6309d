use std::path::Path;

use attire_core::learning::{FeedbackEntry, FeedbackKind, SessionAnalytics, WeatherContext};
use attire_core::weather::derive_analysis;
use chrono::{Local, Timelike};
use serde::Serialize;

use crate::commands::CommandResult;
use crate::runtime::{input_failure, open_advisor, read_snapshot, user_context, GlobalOptions};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackReceipt {
    entry: FeedbackEntry,
    item_preference: f64,
    session: Option<SessionAnalytics>,
}

/// Records feedback for an item recommended under the given weather and context.
pub fn run(
    options: &GlobalOptions,
    weather: &Path,
    item: &str,
    kind: &str,
    activity_level: Option<f64>,
    style_preference: Option<f64>,
) -> CommandResult {
    let kind: FeedbackKind = match kind.parse() {
        Ok(kind) => kind,
        Err(message) => return input_failure("feedback", message),
    };
    let snapshot = match read_snapshot("feedback", weather) {
        Ok(snapshot) => snapshot,
        Err(failure) => return failure,
    };
    let user = match user_context("feedback", activity_level, style_preference) {
        Ok(user) => user,
        Err(failure) => return failure,
    };

    let mut advisor = match open_advisor("feedback", options) {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    // Pure analysis: feedback must not grow the weather log.
    let analysis = derive_analysis(&snapshot, Local::now().hour());
    let recommendations = advisor.generate_recommendations(&analysis, &user);
    let Some(recommendation) =
        recommendations.iter().find(|rec| rec.item.eq_ignore_ascii_case(item.trim()))
    else {
        let offered: Vec<&str> = recommendations.iter().map(|rec| rec.item.as_str()).collect();
        return input_failure(
            "feedback",
            format!("`{item}` is not recommended for this weather (offered: {})", offered.join(", ")),
        );
    };

    let context = WeatherContext {
        temperature: snapshot.current.temperature,
        condition: snapshot.current.condition.clone(),
        time_of_day: analysis.time_of_day.period,
    };
    let entry = advisor.record_feedback(recommendation, kind, context);
    let receipt = FeedbackReceipt {
        item_preference: advisor.state().profile.item_preference(&entry.recommendation.item),
        session: advisor.session_analytics(),
        entry,
    };

    CommandResult::with_data(
        "feedback",
        format!("recorded `{kind}` for {}", receipt.entry.recommendation.item),
        &receipt,
    )
}
