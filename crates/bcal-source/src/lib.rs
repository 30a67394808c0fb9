//! Activity log retrieval.
//!
//! Rows come either from a remote endpoint serving a JSON array of
//! `{timestamp, activity}` objects (a published spreadsheet, typically) or
//! from a local file holding the same array or one object per line.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bcal_core::RawLogRow;
use thiserror::Error;
use tracing::debug;

/// Default request timeout for remote fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Log retrieval errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Endpoint answered with a non-success status.
    #[error("log endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Reading a local file or stdin failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The body was not a JSON array of rows.
    #[error("invalid log JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A JSON-lines record was malformed.
    #[error("invalid log record on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Where to read the log from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// An `http://` or `https://` URL.
    Remote(String),
    /// A local file.
    File(PathBuf),
    /// Standard input, written as `-`.
    Stdin,
}

impl LogSource {
    /// Interprets a user-supplied source string.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source == "-" {
            Self::Stdin
        } else if source.starts_with("http://") || source.starts_with("https://") {
            Self::Remote(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// HTTP client for remote logs.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::ClientBuild)?;
        Ok(Self { http })
    }

    /// Fetches and decodes the rows served at `url`.
    pub async fn fetch_rows(&self, url: &str) -> Result<Vec<RawLogRow>, SourceError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows = parse_rows(&body)?;
        debug!(url, rows = rows.len(), "fetched activity log");
        Ok(rows)
    }
}

/// Reads rows from a local file.
pub fn read_rows(path: &Path) -> Result<Vec<RawLogRow>, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let rows = parse_rows(&text)?;
    debug!(path = %path.display(), rows = rows.len(), "read activity log");
    Ok(rows)
}

/// Reads rows from any reader, e.g. standard input.
pub fn read_rows_from<R: Read>(mut reader: R, name: &str) -> Result<Vec<RawLogRow>, SourceError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| SourceError::Io {
            path: name.to_string(),
            source,
        })?;
    parse_rows(&text)
}

/// Decodes a JSON array of rows, or JSON lines if the text is not an array.
pub fn parse_rows(text: &str) -> Result<Vec<RawLogRow>, SourceError> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| SourceError::Line {
                line: index + 1,
                source,
            })
        })
        .collect()
}
