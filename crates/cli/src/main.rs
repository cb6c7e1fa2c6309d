use std::process::ExitCode;

fn main() -> ExitCode {
    attire_cli::run()
}
