use std::process::ExitCode;

fn main() -> ExitCode {
    docdesk_cli::run()
}
