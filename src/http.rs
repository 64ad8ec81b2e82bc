//! Shared HTTP response handling for the marketplace clients.

use reqwest::{Response, StatusCode};

use crate::error::{Result, SyncError};

/// Maps a non-success catalog/feed response onto the error taxonomy:
/// 401/403 are credential failures, anything else keeps its status code.
pub(crate) async fn ensure_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let details = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SyncError::Auth { status, details });
    }
    Err(SyncError::HttpStatus(status))
}

/// Like `ensure_status`, but a rejected payload is an update failure rather
/// than a fetch failure.
pub(crate) async fn ensure_accepted(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let details = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SyncError::Auth { status, details });
    }
    Err(SyncError::Update { status, details })
}

/// Reads and decodes a JSON response body.
pub(crate) async fn read_json<T>(response: Response) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
