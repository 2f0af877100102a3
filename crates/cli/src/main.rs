use std::process::ExitCode;

fn main() -> ExitCode {
    cosden_cli::run()
}
