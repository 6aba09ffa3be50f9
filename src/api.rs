// API client module: a small blocking HTTP client that uploads one file to
// files.vc and turns the JSON answer into an `UploadResult`. Each call is a
// single attempt; nothing is retried or cached between calls.

use crate::error::UploadError;
use crate::event::{Logger, UploadEvent, UrlKind};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

/// Production upload endpoint.
pub const UPLOAD_ENDPOINT: &str = "https://api.files.vc/upload";

/// Largest file the service accepts: 10 GiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024 * 1024;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the account ID. Uploads tied to an account never expire.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Multipart field name the service reads the file from.
const FILE_FIELD: &str = "file";

/// Credentials and logging hook for one upload.
#[derive(Clone, Default)]
pub struct UploadOptions {
    pub api_key: String,
    pub account_id: Option<String>,
    pub logger: Option<Logger>,
}

/// What a successful upload returns. `raw` is the full decoded response, so
/// fields the service adds later are still reachable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub page_url: Option<String>,
    pub file_url: Option<String>,
    pub raw: Map<String, Value>,
}

/// Blocking client bound to one upload endpoint. Cheap to clone; clones share
/// the connection pool but no per-upload state.
#[derive(Clone)]
pub struct UploadClient {
    client: Client,
    endpoint: String,
    max_file_size: u64,
}

impl UploadOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        UploadOptions {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Associate the upload with an account. An empty ID is ignored.
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        let account_id = account_id.into();
        self.account_id = (!account_id.is_empty()).then_some(account_id);
        self
    }

    pub fn logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&UploadEvent) + Send + Sync + 'static,
    {
        self.logger = Some(std::sync::Arc::new(logger));
        self
    }

    fn log(&self, event: UploadEvent) {
        if let Some(logger) = &self.logger {
            logger(&event);
        }
    }

    fn account(&self) -> Option<&str> {
        self.account_id.as_deref().filter(|id| !id.is_empty())
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The key is a secret; only report whether one is set.
        f.debug_struct("UploadOptions")
            .field("api_key", &(!self.api_key.is_empty()).then_some("<redacted>"))
            .field("account_id", &self.account_id)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl UploadResult {
    /// Picks the share URLs out of a decoded response body. Returns the body
    /// back when neither URL is present so it can be reported.
    fn from_body(body: Value) -> Result<Self, Value> {
        let Value::Object(raw) = body else {
            return Err(body);
        };
        let page_url = url_field(&raw, "page_url");
        let file_url = url_field(&raw, "file_url");
        if page_url.is_none() && file_url.is_none() {
            return Err(Value::Object(raw));
        }
        Ok(UploadResult {
            page_url,
            file_url,
            raw,
        })
    }
}

fn url_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

/// Fails with `FileTooLarge` when `size` is over `limit`. A file of exactly
/// `limit` bytes is accepted.
pub fn check_file_size(size: u64, limit: u64) -> Result<(), UploadError> {
    if size > limit {
        return Err(UploadError::FileTooLarge { size, limit });
    }
    Ok(())
}

impl UploadClient {
    /// Create a client for the production endpoint.
    pub fn new() -> Result<Self, UploadError> {
        Self::with_endpoint(UPLOAD_ENDPOINT)
    }

    /// Create a client that posts to `endpoint` instead of files.vc.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, UploadError> {
        // The blocking client defaults to a 30s total timeout, which would
        // cut off large uploads.
        let client = Client::builder().timeout(None).build()?;
        Ok(UploadClient {
            client,
            endpoint: endpoint.into(),
            max_file_size: MAX_FILE_SIZE,
        })
    }

    /// Override the size limit enforced before sending.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the authentication headers. The account header is only set
    /// when an account ID is present.
    fn auth_headers(&self, options: &UploadOptions) -> Result<HeaderMap, UploadError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&options.api_key)
            .map_err(|_| UploadError::InvalidHeader(API_KEY_HEADER))?;
        headers.insert(API_KEY_HEADER, key);
        if let Some(account_id) = options.account() {
            let val = HeaderValue::from_str(account_id)
                .map_err(|_| UploadError::InvalidHeader(ACCOUNT_ID_HEADER))?;
            headers.insert(ACCOUNT_ID_HEADER, val);
        }
        Ok(headers)
    }

    /// Upload `file_path` and return the share URLs.
    ///
    /// Checks run before any network I/O, in order: the path is an existing
    /// regular file, the API key is non-empty, the size is within the limit.
    /// The file is streamed from disk as the multipart field `file`; its
    /// handle is owned by the request body and closed when the call returns.
    pub fn upload_file(
        &self,
        file_path: impl AsRef<Path>,
        options: &UploadOptions,
    ) -> Result<UploadResult, UploadError> {
        let file_path = file_path.as_ref();

        let metadata = match fs::metadata(file_path) {
            Ok(m) if m.is_file() => m,
            _ => {
                return Err(UploadError::FileNotFound {
                    path: file_path.to_path_buf(),
                })
            }
        };
        if options.api_key.is_empty() {
            return Err(UploadError::MissingCredential);
        }
        let size = metadata.len();
        check_file_size(size, self.max_file_size)?;

        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".into());
        options.log(UploadEvent::Start {
            file_name: file_name.clone(),
        });

        let headers = self.auth_headers(options)?;
        if let Some(account_id) = options.account() {
            options.log(UploadEvent::AccountNotice {
                account_id: account_id.to_string(),
            });
        }

        let file = File::open(file_path).map_err(|source| UploadError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;
        let part = multipart::Part::reader_with_length(file, size)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        debug!(endpoint = %self.endpoint, size, account = options.account().is_some(), "sending upload request");
        let res = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .multipart(form)
            .send()?;

        let status = res.status();
        let txt = res.text()?;
        debug!(%status, body_len = txt.len(), "upload response received");
        if !status.is_success() {
            return Err(UploadError::from_error_body(status, &txt));
        }

        let body = serde_json::from_str::<Value>(&txt).unwrap_or(Value::String(txt));
        let result = UploadResult::from_body(body)
            .map_err(|body| UploadError::UnexpectedResponseFormat { body })?;

        options.log(UploadEvent::Success);
        if let Some(url) = &result.page_url {
            options.log(UploadEvent::UrlFound {
                kind: UrlKind::Page,
                url: url.clone(),
            });
        }
        if let Some(url) = &result.file_url {
            options.log(UploadEvent::UrlFound {
                kind: UrlKind::File,
                url: url.clone(),
            });
        }
        Ok(result)
    }
}

/// Upload `file_path` to files.vc with a fresh client.
pub fn upload_file(
    file_path: impl AsRef<Path>,
    options: &UploadOptions,
) -> Result<UploadResult, UploadError> {
    UploadClient::new()?.upload_file(file_path, options)
}
