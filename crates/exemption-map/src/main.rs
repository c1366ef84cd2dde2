use exemption_map::{Settings, logging, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::setup_logging();

    let settings = Settings::from_cli();
    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
