// UI layer: turns parsed arguments into one upload and prints the outcome
// with colors. All console output lives here; the `api` module never
// prints.

use crate::api::{UploadClient, UploadOptions, UploadResult};
use crate::cli::Cli;
use crate::error::UploadError;
use crate::event::UploadEvent;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::time::Duration;

/// Run one upload for the parsed command line. Errors are returned to
/// `main`, which prints them with `report_error` and exits with status 1.
pub fn run(cli: &Cli) -> Result<UploadResult> {
    let api_key = cli.api_key.clone().unwrap_or_default();
    let mut options = UploadOptions::new(api_key);
    if let Some(account_id) = &cli.account_id {
        options = options.account_id(account_id.as_str());
    }

    // Size is printed up front like the upload itself will see it. A stat
    // failure is left for the upload call to report.
    if let Ok(meta) = fs::metadata(&cli.file) {
        if meta.is_file() {
            let size_mb = meta.len() as f64 / (1024.0 * 1024.0);
            println!("{}", format!("File size: {:.2} MB", size_mb).blue());
        }
    }

    // indicatif's spinner runs while the request is in flight. It draws to
    // stderr and stays hidden when stderr is not a terminal.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").context("Invalid spinner template")?);
    spinner.set_message("Uploading...");

    let printer = spinner.clone();
    let options = options.logger(move |event| {
        let line = styled_event(event);
        printer.suspend(|| println!("{}", line));
        if matches!(event, UploadEvent::Start { .. }) {
            printer.enable_steady_tick(Duration::from_millis(100));
        }
    });

    let client = UploadClient::with_endpoint(cli.endpoint.as_str())?;
    let outcome = client.upload_file(&cli.file, &options);
    spinner.finish_and_clear();
    Ok(outcome?)
}

/// Colors an upload event the way the console output shows it.
fn styled_event(event: &UploadEvent) -> String {
    match event {
        UploadEvent::Start { .. } | UploadEvent::AccountNotice { .. } => event.to_string().blue().to_string(),
        UploadEvent::Success => event.to_string().green().to_string(),
        UploadEvent::UrlFound { kind, url } => {
            format!("{} {}", format!("{}:", kind.label()).yellow(), url.as_str().cyan())
        }
    }
}

/// Print an error to stderr in red, with extra hints for the failures a
/// user can fix or needs to inspect.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{}", format!("Error: {}", err).red());
    match err.downcast_ref::<UploadError>() {
        Some(UploadError::MissingCredential) => {
            eprintln!(
                "{}",
                "Please set the FILES_VC_API_KEY environment variable or pass --api-key.".yellow()
            );
            eprintln!(
                "{}",
                "You can create a .env file with FILES_VC_API_KEY=your-api-key or set it in your environment."
                    .yellow()
            );
        }
        Some(UploadError::UnexpectedResponseFormat { body }) => {
            let data = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
            eprintln!("{} {}", "Response data:".yellow(), data);
        }
        _ => {}
    }
}
