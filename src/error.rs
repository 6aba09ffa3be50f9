// Error module: the single failure type returned by the upload operation.
// Every failure is terminal for the call; nothing here is retried.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one upload call. Variants map one-to-one to the reasons an
/// upload can stop, so callers can match on them instead of parsing text.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The path does not exist or is not a regular file.
    #[error("File not found at {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// No API key, or an empty one, was supplied.
    #[error("API key is not set")]
    MissingCredential,

    /// The file is larger than the service accepts.
    #[error("File size exceeds the {} limit ({size} bytes)", format_limit(.limit))]
    FileTooLarge { size: u64, limit: u64 },

    /// The file passed the stat but could not be opened for reading.
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A credential contains bytes that are not valid in an HTTP header.
    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),

    /// The request could not be sent or the server answered with a non-2xx
    /// status. `payload` holds the server's decoded error body, if any.
    #[error("Upload failed: {message}")]
    TransportFailure {
        message: String,
        payload: Option<Value>,
    },

    /// The server answered 2xx but the body had neither `page_url` nor
    /// `file_url`. `body` is the decoded response for diagnostics.
    #[error("Upload failed: Unexpected response format")]
    UnexpectedResponseFormat { body: Value },
}

impl UploadError {
    /// Builds a transport failure from a non-2xx response body, preferring
    /// the server's structured payload over the bare status line.
    pub(crate) fn from_error_body(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(payload) => UploadError::TransportFailure {
                message: payload_message(&payload),
                payload: Some(payload),
            },
            Err(_) if !body.trim().is_empty() => UploadError::TransportFailure {
                message: body.trim().to_string(),
                payload: None,
            },
            Err(_) => UploadError::TransportFailure {
                message: status.to_string(),
                payload: None,
            },
        }
    }

    /// The raw server payload attached to this error, if there is one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            UploadError::TransportFailure { payload, .. } => payload.as_ref(),
            UploadError::UnexpectedResponseFormat { body } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::TransportFailure {
            message: err.to_string(),
            payload: None,
        }
    }
}

// Servers answer `{"error": "..."}` or `{"message": "..."}`; anything else
// is reported as compact JSON.
fn payload_message(payload: &Value) -> String {
    for key in ["error", "message"] {
        if let Some(msg) = payload.get(key).and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_limit(limit: &u64) -> String {
    let limit = *limit;
    const GIB: u64 = 1024 * 1024 * 1024;
    const MIB: u64 = 1024 * 1024;
    if limit >= GIB && limit % GIB == 0 {
        format!("{}GB", limit / GIB)
    } else if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{} byte", limit)
    }
}
