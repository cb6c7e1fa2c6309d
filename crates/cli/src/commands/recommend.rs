use std::path::Path;

use crate::commands::CommandResult;
use crate::runtime::{open_advisor, read_snapshot, user_context, GlobalOptions};

pub fn run(
    options: &GlobalOptions,
    weather: &Path,
    activity_level: Option<f64>,
    style_preference: Option<f64>,
) -> CommandResult {
    let snapshot = match read_snapshot("recommend", weather) {
        Ok(snapshot) => snapshot,
        Err(failure) => return failure,
    };
    let context = match user_context("recommend", activity_level, style_preference) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let mut advisor = match open_advisor("recommend", options) {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    let report = advisor.recommend(&snapshot, &context);

    tracing::info!(
        event_name = "cli.recommend.completed",
        location = %report.location,
        recommendations = report.recommendations.len(),
        "recommendations generated"
    );

    CommandResult::with_data(
        "recommend",
        format!("{} recommendations for {}", report.recommendations.len(), report.location),
        &report,
    )
}
