//! HTTP lookup backend for the administrative-location API.
//!
//! Endpoints (the misspelled `adminitrative` segment is what the server
//! exposes):
//!
//! - `GET /api/v1/location/adminitrative/district?province_id=<id>`
//! - `GET /api/v1/location/adminitrative/ward?district_id=<id>`
//!
//! Both return `{ "data": [{id, title}, ...] }`. A non-success status or a
//! body without `data` is treated identically to an empty sequence; only
//! transport and decode failures surface as errors.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{LocationLookup, LookupError, LookupPayload, OptionItem};

const DISTRICT_PATH: &str = "/api/v1/location/adminitrative/district";
const WARD_PATH: &str = "/api/v1/location/adminitrative/ward";

// ---------------------------------------------------------------------------
// HttpLookup
// ---------------------------------------------------------------------------

/// [`LocationLookup`] implementation backed by the location HTTP API.
///
/// # Examples
///
/// ```no_run
/// use cascade_select::lookup::HttpLookup;
///
/// let lookup = HttpLookup::new("https://example.com").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: Client,
    base_url: Url,
}

impl HttpLookup {
    /// Create a lookup against the given base URL with a default client.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, LookupError> {
        Ok(Self::with_client(
            Client::new(),
            Url::parse(base_url.as_ref())?,
        ))
    }

    /// Create a lookup with a caller-supplied [`Client`], e.g. one carrying
    /// auth headers or timeouts.
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch(
        &self,
        path: &str,
        param: &str,
        parent_id: &str,
    ) -> Result<Vec<OptionItem>, LookupError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut().append_pair(param, parent_id);

        debug!(%url, "issuing location lookup");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%status, "non-success lookup response, treating as empty");
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        let payload: LookupPayload = serde_json::from_str(&body)?;
        Ok(payload.into_items())
    }
}

#[async_trait]
impl LocationLookup for HttpLookup {
    async fn districts(&self, province_id: &str) -> Result<Vec<OptionItem>, LookupError> {
        self.fetch(DISTRICT_PATH, "province_id", province_id).await
    }

    async fn wards(&self, district_id: &str) -> Result<Vec<OptionItem>, LookupError> {
        self.fetch(WARD_PATH, "district_id", district_id).await
    }
}

// ===========================================================================
// Tests
// ===========================================================================
