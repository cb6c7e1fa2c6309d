use std::path::Path;

use attire_core::learning::UserDataImport;

use crate::commands::CommandResult;
use crate::runtime::{input_failure, open_advisor, read_input, GlobalOptions};

pub fn run(options: &GlobalOptions, input: &Path) -> CommandResult {
    let data: UserDataImport = match read_input(input)
        .and_then(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from))
    {
        Ok(data) => data,
        Err(error) => return input_failure("import", format!("invalid import document: {error:#}")),
    };

    let mut advisor = match open_advisor("import", options) {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    let summary = advisor.import_user_data(data);
    CommandResult::with_data(
        "import",
        format!("imported data; {} feedback entries on record", summary.data_points),
        &summary,
    )
}
