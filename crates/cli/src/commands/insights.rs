use crate::commands::CommandResult;
use crate::runtime::{open_advisor, GlobalOptions};

pub fn run(options: &GlobalOptions) -> CommandResult {
    let advisor = match open_advisor("insights", options) {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    let insights = advisor.personalized_insights();
    CommandResult::with_data("insights", insights.message.clone(), &insights)
}
