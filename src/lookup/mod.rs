//! Remote lookup collaborator: the data source behind the cascade.
//!
//! [`LocationLookup`] is the seam between the cascade component and whatever
//! serves the administrative-division data. [`http::HttpLookup`] talks to the
//! real API; [`memory::StaticLookup`] serves fixed tables for tests and
//! offline use.

use async_trait::async_trait;
use serde::de::Deserializer;
use serde::Deserialize;
use thiserror::Error;

pub mod http;
pub mod memory;

pub use http::HttpLookup;
pub use memory::StaticLookup;

// ---------------------------------------------------------------------------
// OptionItem
// ---------------------------------------------------------------------------

/// One record from a lookup payload: an opaque id and a display title.
///
/// The API serializes ids as JSON numbers; some deployments send strings.
/// Both deserialize to the string form used as the option value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionItem {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub title: String,
}

impl OptionItem {
    /// Create an item from an id and a title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n.to_string()),
        Raw::Text(s) => Ok(s),
    }
}

/// Wire shape of a lookup response: `{ "data": [...] }`.
///
/// A missing `data` field decodes to `None` and is treated as an empty
/// sequence by the callers.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupPayload {
    #[serde(default)]
    pub(crate) data: Option<Vec<OptionItem>>,
}

impl LookupPayload {
    pub(crate) fn into_items(self) -> Vec<OptionItem> {
        self.data.unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// LookupError
// ---------------------------------------------------------------------------

/// Failures a lookup backend can report.
///
/// The cascade collapses every variant to an empty result; the variants exist
/// so backends can be tested and operators can read meaningful log lines.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid lookup url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// LocationLookup
// ---------------------------------------------------------------------------

/// Ordered lookups for the two downstream levels of the hierarchy.
///
/// Implementations must preserve the order the backing source returns;
/// the cascade appends options in exactly that order.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// Districts under the given province.
    async fn districts(&self, province_id: &str) -> Result<Vec<OptionItem>, LookupError>;

    /// Wards under the given district.
    async fn wards(&self, district_id: &str) -> Result<Vec<OptionItem>, LookupError>;
}

// ===========================================================================
// Tests
// ===========================================================================
