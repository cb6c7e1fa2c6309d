use chrono::Utc;

use crate::commands::CommandResult;
use crate::runtime::{open_advisor, GlobalOptions};

pub fn run(options: &GlobalOptions) -> CommandResult {
    let advisor = match open_advisor("seasonal", options) {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    match advisor.seasonal_patterns(Utc::now()) {
        Some(pattern) => CommandResult::with_data(
            "seasonal",
            format!("{} observations this season", pattern.data_points),
            &pattern,
        ),
        None => CommandResult::success("seasonal", "not enough observations for this season yet"),
    }
}
