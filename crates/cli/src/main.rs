use std::process::ExitCode;

fn main() -> ExitCode {
    tapparelle_cli::run()
}
