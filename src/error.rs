//! Error types for sync operations

use std::fmt;

/// Unified error type for feed and marketplace operations
#[derive(Debug)]
pub enum SyncError {
    /// HTTP request failed (network error, timeout, etc.)
    Connection(reqwest::Error),
    /// Marketplace rejected the credentials
    Auth {
        status: reqwest::StatusCode,
        details: String,
    },
    /// Marketplace rejected an update payload
    Update {
        status: reqwest::StatusCode,
        details: String,
    },
    /// Failed to parse a JSON response
    Parse(serde_json::Error),
    /// Unexpected HTTP status from a data source
    HttpStatus(reqwest::StatusCode),
    /// Supplier feed archive could not be opened
    Archive(zip::result::ZipError),
    /// Supplier stock sheet could not be read
    Sheet(csv::Error),
    /// Supplier feed content is malformed
    Feed(String),
    /// Required configuration is missing or invalid
    Config(String),
    /// Stream I/O failed
    Io(std::io::Error),
}

impl SyncError {
    /// The user-facing error category this variant reports as.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Connection(_) => "ConnectionError",
            SyncError::Auth { .. } => "AuthError",
            SyncError::Update { .. } => "UpdateError",
            SyncError::Parse(_)
            | SyncError::HttpStatus(_)
            | SyncError::Archive(_)
            | SyncError::Sheet(_)
            | SyncError::Feed(_)
            | SyncError::Io(_) => "FetchError",
            SyncError::Config(_) => "ConfigError",
        }
    }

    /// The full console line shown to the user: `<ErrorKind> - '<message>'`.
    pub fn user_message(&self) -> String {
        format!("{} - '{}'", self.kind(), self)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Connection(e) => write!(f, "network failure: {}", e),
            SyncError::Auth { status, details } => {
                if details.is_empty() {
                    write!(f, "marketplace rejected the credentials ({})", status)
                } else {
                    write!(f, "marketplace rejected the credentials ({}): {}", status, details)
                }
            }
            SyncError::Update { status, details } => {
                write!(f, "marketplace rejected the update ({}): {}", status, details)
            }
            SyncError::Parse(e) => write!(f, "malformed JSON response: {}", e),
            SyncError::HttpStatus(status) => write!(f, "unexpected HTTP status: {}", status),
            SyncError::Archive(e) => write!(f, "broken feed archive: {}", e),
            SyncError::Sheet(e) => write!(f, "unreadable stock sheet: {}", e),
            SyncError::Feed(msg) => write!(f, "malformed feed data: {}", msg),
            SyncError::Config(msg) => write!(f, "configuration error: {}", msg),
            SyncError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Connection(e) => Some(e),
            SyncError::Parse(e) => Some(e),
            SyncError::Archive(e) => Some(e),
            SyncError::Sheet(e) => Some(e),
            SyncError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Connection(err)
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Parse(err)
    }
}

impl From<zip::result::ZipError> for SyncError {
    fn from(err: zip::result::ZipError) -> Self {
        SyncError::Archive(err)
    }
}

impl From<csv::Error> for SyncError {
    fn from(err: csv::Error) -> Self {
        SyncError::Sheet(err)
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err)
    }
}

/// Result alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
