use std::process::ExitCode;

fn main() -> ExitCode {
    sourcemate_cli::run()
}
