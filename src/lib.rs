// Library root
// -----------
// This crate exposes the upload logic as a library so it can be embedded,
// and the binary (`main.rs`) wraps it in a command-line tool.
//
// Module responsibilities:
// - `api`: the upload operation itself (validation, multipart request,
//   response interpretation).
// - `error`: the `UploadError` failure kinds.
// - `event`: structured progress events handed to the caller's logger.
// - `cli`: argument/environment parsing and log setup for the binary.
// - `ui`: console output for the binary; the only place that prints.
pub mod api;
pub mod cli;
pub mod error;
pub mod event;
pub mod ui;

pub use api::{upload_file, UploadClient, UploadOptions, UploadResult};
pub use error::UploadError;
pub use event::{Logger, UploadEvent, UrlKind};
