// Command-line surface: argument and environment parsing plus log setup.
// Flags win over environment variables, which win over a `.env` file
// (loaded by `main` before parsing).

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::api::UPLOAD_ENDPOINT;

/// A simple command-line tool to upload files to files.vc
#[derive(Parser, Debug)]
#[command(name = "filesvc-uploader")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the file you want to upload
    pub file: PathBuf,

    /// Files.vc API key
    #[arg(short = 'k', long, env = "FILES_VC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Optional account ID to associate with the upload (overrides environment variable)
    #[arg(short, long, env = "FILES_VC_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Upload endpoint
    #[arg(long, env = "FILES_VC_ENDPOINT", default_value = UPLOAD_ENDPOINT, hide = true)]
    pub endpoint: String,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// `level`; output goes to stderr so stdout only carries upload results.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be set when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
