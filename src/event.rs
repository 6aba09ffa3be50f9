// Upload events: what the upload operation reports to its caller while it
// runs. Callers that only want text print the `Display` form; callers that
// want structure match on the variants.

use std::fmt;
use std::sync::Arc;

/// Callback receiving upload events. Shared so options stay `Clone`.
pub type Logger = Arc<dyn Fn(&UploadEvent) + Send + Sync>;

/// Which of the two share URLs a `UrlFound` event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Landing page for the file.
    Page,
    /// Direct download link.
    File,
}

/// One step of an upload, emitted in this order: `Start`, optional
/// `AccountNotice`, then on success `Success` followed by one `UrlFound`
/// per URL in the response (page before file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Start { file_name: String },
    AccountNotice { account_id: String },
    Success,
    UrlFound { kind: UrlKind, url: String },
}

impl UrlKind {
    pub fn label(&self) -> &'static str {
        match self {
            UrlKind::Page => "Page URL",
            UrlKind::File => "Direct File URL",
        }
    }
}

impl fmt::Display for UploadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadEvent::Start { file_name } => write!(f, "Uploading {} to files.vc...", file_name),
            UploadEvent::AccountNotice { account_id } => {
                write!(f, "Using account ID: {} (files will never expire)", account_id)
            }
            UploadEvent::Success => f.write_str("Upload successful!"),
            UploadEvent::UrlFound { kind, url } => write!(f, "{}: {}", kind.label(), url),
        }
    }
}
