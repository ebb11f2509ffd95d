//! Download of source documents named by `file_url`

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

/// Fetch the document at `url`, bounded by the client timeout and `max_bytes`.
///
/// Transport failures, timeouts and non-2xx statuses all surface as
/// [`ApiError::Fetch`]. There is no retry. The body is read chunk by chunk
/// and abandoned as soon as it passes `max_bytes`, whether or not the
/// server announced a Content-Length.
pub async fn fetch_pdf(client: &Client, url: &Url, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let mut response = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ApiError::Fetch(e.to_string()))?;

    if let Some(length) = response.content_length() {
        if length > max_bytes as u64 {
            return Err(too_large(max_bytes));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ApiError::Fetch(e.to_string()))?
    {
        if body.len() + chunk.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        body.extend_from_slice(&chunk);
    }

    debug!(url = %redacted(url), bytes = body.len(), "fetched source document");
    Ok(body)
}

/// `url` reduced to scheme, host, port and path, for logging.
///
/// Presigned links carry their credentials in the query string (or,
/// occasionally, the userinfo), neither of which belongs in a log line.
pub fn redacted(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

fn too_large(max_bytes: usize) -> ApiError {
    ApiError::Fetch(format!("document exceeds the {} byte limit", max_bytes))
}
