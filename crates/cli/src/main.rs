use std::process::ExitCode;

fn main() -> ExitCode {
    retailscope_cli::run()
}
