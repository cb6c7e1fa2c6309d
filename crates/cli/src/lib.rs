pub mod commands;
pub mod runtime;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::runtime::GlobalOptions;

#[derive(Debug, Parser)]
#[command(
    name = "attire",
    about = "Weather-driven outfit recommendations that learn from feedback",
    long_about = "Recommend clothing for a weather snapshot, record feedback, and inspect or move learned preferences.",
    after_help = "Examples:\n  attire recommend --weather today.json\n  attire feedback --weather today.json --item \"Winter hat\" --kind like\n  attire insights\n  attire doctor --json"
)]
pub struct Cli {
    #[command(flatten)]
    options: GlobalOptions,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Analyze a weather snapshot and print recommendations with an avatar outfit")]
    Recommend {
        #[arg(long, help = "Weather snapshot JSON file, or - for stdin")]
        weather: PathBuf,
        #[arg(long, help = "Activity level in [0, 1]")]
        activity_level: Option<f64>,
        #[arg(long, help = "Style preference in [0, 1]")]
        style_preference: Option<f64>,
    },
    #[command(about = "Record feedback for an item recommended under a weather snapshot")]
    Feedback {
        #[arg(long, help = "Weather snapshot JSON file, or - for stdin")]
        weather: PathBuf,
        #[arg(long, help = "Recommended item, e.g. \"Winter hat\"")]
        item: String,
        #[arg(long, help = "worn | like | ignored | dislike | inappropriate")]
        kind: String,
        #[arg(long, help = "Activity level in [0, 1], as passed to recommend")]
        activity_level: Option<f64>,
        #[arg(long, help = "Style preference in [0, 1], as passed to recommend")]
        style_preference: Option<f64>,
    },
    #[command(about = "Summarize learned preferences")]
    Insights,
    #[command(about = "Average conditions observed during the current season")]
    Seasonal,
    #[command(about = "Export feedback history, profile and learned weights")]
    Export {
        #[arg(long, help = "Write the export to this file instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(about = "Import a previous export; omitted parts are left untouched")]
    Import {
        #[arg(long, help = "Export JSON file, or - for stdin")]
        input: PathBuf,
    },
    #[command(about = "Erase all learned data")]
    Clear {
        #[arg(long, help = "Confirm the erase")]
        yes: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, storage connectivity, and stored documents")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.options;

    if let Ok(config) = attire_core::config::AppConfig::load(options.load_options()) {
        runtime::init_logging(&config.logging);
    }

    let result = match cli.command {
        Command::Recommend { weather, activity_level, style_preference } => {
            commands::recommend::run(&options, &weather, activity_level, style_preference)
        }
        Command::Feedback { weather, item, kind, activity_level, style_preference } => {
            commands::feedback::run(&options, &weather, &item, &kind, activity_level, style_preference)
        }
        Command::Insights => commands::insights::run(&options),
        Command::Seasonal => commands::seasonal::run(&options),
        Command::Export { output } => commands::export::run(&options, output.as_deref()),
        Command::Import { input } => commands::import::run(&options, &input),
        Command::Clear { yes } => commands::clear::run(&options, yes),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(&options) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(&options, json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
