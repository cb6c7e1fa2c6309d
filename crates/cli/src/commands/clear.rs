use crate::commands::CommandResult;
use crate::runtime::{input_failure, open_advisor, GlobalOptions};

pub fn run(options: &GlobalOptions, confirmed: bool) -> CommandResult {
    if !confirmed {
        return input_failure("clear", "refusing to erase learned data without --yes");
    }

    let mut advisor = match open_advisor("clear", options) {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    advisor.clear_all_data();
    CommandResult::success("clear", "cleared feedback history, profile and learned weights")
}
