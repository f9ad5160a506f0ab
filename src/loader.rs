//! JSON loading from various sources.
//!
//! Handles loading documents from files, strings, bytes, and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::error::MatchError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `MatchError::FileNotFound` if the file doesn't exist,
/// or `MatchError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, MatchError> {
    if !path.exists() {
        return Err(MatchError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read(path).map_err(|source| MatchError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded file");
    load_json_bytes(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `MatchError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Value, MatchError> {
    serde_json::from_str(content).map_err(|source| MatchError::InvalidJson { source })
}

/// Load a JSON document from raw bytes.
///
/// # Errors
///
/// Returns `MatchError::InvalidJson` if the bytes aren't valid JSON.
pub fn load_json_bytes(content: &[u8]) -> Result<Value, MatchError> {
    serde_json::from_slice(content).map_err(|source| MatchError::InvalidJson { source })
}

/// Load a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `MatchError::NetworkError` if the request fails or the body
/// isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<Value, MatchError> {
    let network_error = |source| MatchError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    tracing::debug!(url, "fetching document");
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a JSON document from a file path or URL.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_json_auto(source: &str) -> Result<Value, MatchError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_json_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(MatchError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_json(Path::new(source))
    }
}

/// Navigate a JSON Pointer fragment (e.g., "#/$defs/foo" or "#/properties/bar").
///
/// The fragment may start with '#'. An empty fragment selects the document.
///
/// # Errors
///
/// Returns `MatchError::InvalidSchema` if any step of the pointer is absent.
pub fn navigate_fragment<'a>(document: &'a Value, fragment: &str) -> Result<&'a Value, MatchError> {
    let path = fragment.trim_start_matches('#').trim_start_matches('/');
    if path.is_empty() {
        return Ok(document);
    }

    let mut current = document;
    for part in path.split('/') {
        // Unescape JSON Pointer encoding (~1 = /, ~0 = ~)
        let key = part.replace("~1", "/").replace("~0", "~");
        let next = match current {
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            other => other.get(&key),
        };
        current = next.ok_or_else(|| MatchError::InvalidSchema {
            message: format!("fragment not found: {}", fragment),
        })?;
    }
    Ok(current)
}
