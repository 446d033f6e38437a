//! In-memory lookup backend with fixed tables.
//!
//! Useful in tests and anywhere the hierarchy is known ahead of time.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{LocationLookup, LookupError, OptionItem};

// ---------------------------------------------------------------------------
// StaticLookup
// ---------------------------------------------------------------------------

/// [`LocationLookup`] over in-memory tables keyed by parent id.
///
/// Unknown parent ids resolve to an empty list, matching the remote API's
/// behavior for ids it has no children for.
///
/// # Examples
///
/// ```
/// use cascade_select::lookup::{OptionItem, StaticLookup};
///
/// let lookup = StaticLookup::new()
///     .with_districts("1", vec![OptionItem::new("10", "A")])
///     .with_wards("10", vec![OptionItem::new("100", "X")]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticLookup {
    districts: HashMap<String, Vec<OptionItem>>,
    wards: HashMap<String, Vec<OptionItem>>,
}

impl StaticLookup {
    /// Create a lookup with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the districts under a province (builder pattern).
    pub fn with_districts(mut self, province_id: impl Into<String>, items: Vec<OptionItem>) -> Self {
        self.districts.insert(province_id.into(), items);
        self
    }

    /// Register the wards under a district (builder pattern).
    pub fn with_wards(mut self, district_id: impl Into<String>, items: Vec<OptionItem>) -> Self {
        self.wards.insert(district_id.into(), items);
        self
    }
}

#[async_trait]
impl LocationLookup for StaticLookup {
    async fn districts(&self, province_id: &str) -> Result<Vec<OptionItem>, LookupError> {
        Ok(self.districts.get(province_id).cloned().unwrap_or_default())
    }

    async fn wards(&self, district_id: &str) -> Result<Vec<OptionItem>, LookupError> {
        Ok(self.wards.get(district_id).cloned().unwrap_or_default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
