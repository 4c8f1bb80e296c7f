//! Page fetcher
//!
//! Issues one authenticated GET per page through the rate-limited,
//! retrying transport and hands back the raw body text.

use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::PageRequest;
use tracing::debug;

/// Fetches raw page bodies with a bearer token fixed for the run
pub struct PageFetcher {
    client: HttpClient,
    authorization: String,
}

impl PageFetcher {
    /// Create a fetcher that sends `Authorization: Bearer {token}`
    pub fn new(client: HttpClient, token: impl AsRef<str>) -> Self {
        Self {
            client,
            authorization: format!("Bearer {}", token.as_ref()),
        }
    }

    /// Fetch the complete body for one page
    ///
    /// Any non-2xx status left after retries is returned as
    /// [`Error::HttpStatus`](crate::Error::HttpStatus). A shutdown request
    /// aborts with [`Error::Cancelled`](crate::Error::Cancelled); nothing is
    /// returned until the body has been read in full.
    pub async fn fetch(&self, request: &PageRequest) -> Result<String> {
        debug!(page = request.page, url = %request.url, "Fetching page");
        let config = RequestConfig::new().header("Authorization", self.authorization.as_str());
        let body = self.client.get_text(&request.url, config).await?;
        debug!(page = request.page, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
