use std::path::Path;

use crate::commands::CommandResult;
use crate::runtime::{open_advisor, write_output, GlobalOptions, EXIT_SERIALIZATION};

/// Inline export, or written to `output` with a summary when a path is given.
pub fn run(options: &GlobalOptions, output: Option<&Path>) -> CommandResult {
    let advisor = match open_advisor("export", options) {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };
    let export = advisor.export_user_data();

    let Some(path) = output else {
        return CommandResult::with_data(
            "export",
            format!("exported {} feedback entries", export.data_points),
            &export,
        );
    };

    let written = serde_json::to_string_pretty(&export)
        .map_err(anyhow::Error::from)
        .and_then(|raw| write_output(path, &raw));
    match written {
        Ok(()) => CommandResult::success(
            "export",
            format!("exported {} feedback entries to {}", export.data_points, path.display()),
        ),
        Err(error) => {
            CommandResult::failure("export", "export_write", format!("{error:#}"), EXIT_SERIALIZATION)
        }
    }
}
