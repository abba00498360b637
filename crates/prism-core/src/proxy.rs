//! Cross-origin image relay.
//!
//! Fetches an arbitrary URL on behalf of the browser and hands the body back
//! as a byte stream, so images hosted on other origins can be downloaded from
//! the page. The URL is not validated or restricted in any way.

use crate::error::ProxyError;
use bytes::Bytes;
use futures_util::Stream;

/// Relays images from external URLs.
#[derive(Clone, Default)]
pub struct ImageProxy {
    client: reqwest::Client,
}

/// An upstream response ready to be streamed to the caller.
pub struct ProxiedImage {
    /// Upstream `content-type`, if it sent one
    pub content_type: Option<String>,
    response: reqwest::Response,
}

impl ImageProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// GET `url`, failing on transport errors and non-success statuses.
    ///
    /// Only the status line and headers are read here; the body is pulled
    /// lazily through [`ProxiedImage::into_stream`].
    pub async fn fetch(&self, url: &str) -> Result<ProxiedImage, ProxyError> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        tracing::debug!(
            "Proxying {} ({})",
            url,
            content_type.as_deref().unwrap_or("no content-type")
        );

        Ok(ProxiedImage {
            content_type,
            response,
        })
    }
}

impl ProxiedImage {
    /// Upstream `content-length`, if known.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// The upstream body as chunks, in arrival order.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static {
        self.response.bytes_stream()
    }
}
