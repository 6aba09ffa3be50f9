// Entrypoint for the CLI application.
// - Keeps `main` small: load `.env`, parse arguments, hand off to the UI.
// - Any failure is printed by the UI layer and turns into exit status 1.

use clap::Parser;
use filesvc_uploader::{cli::{init_tracing, Cli}, ui};
use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    // Usage errors exit with 1 like every other failure; --help and
    // --version keep clap's own handling.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&cli.log_level);
    tracing::debug!(file = %cli.file.display(), "starting filesvc-uploader v{}", env!("CARGO_PKG_VERSION"));

    match ui::run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            ui::report_error(&err);
            ExitCode::FAILURE
        }
    }
}
