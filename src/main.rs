use std::process::ExitCode;

fn main() -> ExitCode {
    match energy_exporters::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        // Already logged by `app::run`.
        Err(err) => ExitCode::from(err.exit_code()),
    }
}
