//! Outbound logo download.
//!
//! One fetch per generate operation; the decoded image is shared read-only
//! across every artifact. The fetch is bounded the same way the wallet
//! image path is: 10 seconds wall clock and 5 MiB of body.

use bytes::{Bytes, BytesMut};
use std::time::Duration;

use crate::error::{AssetError, Result};

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Client used for logo downloads. Built once per synchronizer and reused
/// across requests so connection pools survive between operations.
pub fn logo_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("default reqwest client")
}

/// Download logo bytes from a URL, enforcing the timeout and size cap.
///
/// The cap is enforced while streaming, not just from `Content-Length`, so
/// a server that omits or understates its length still cannot exhaust
/// memory.
pub async fn fetch_logo(client: &reqwest::Client, url: &str) -> Result<Bytes> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AssetError::SourceFetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AssetError::SourceFetch(format!(
            "{url} returned {}",
            response.status()
        )));
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_LOGO_BYTES {
            return Err(AssetError::SourceFetch(format!(
                "logo is {len} bytes, cap is {MAX_LOGO_BYTES}"
            )));
        }
    }

    let mut body = BytesMut::new();
    let mut response = response;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AssetError::SourceFetch(e.to_string()))?
    {
        if body.len() + chunk.len() > MAX_LOGO_BYTES {
            return Err(AssetError::SourceFetch(format!(
                "logo body exceeded {MAX_LOGO_BYTES} byte cap"
            )));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}
