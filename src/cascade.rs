//! The cascading selector: keeps district and ward consistent with the
//! selected province and district, and restores captured values once.
//!
//! Chaining is an explicit internal call from the province handler into the
//! district handler rather than a UI event, so the whole cascade can be
//! driven and observed in tests. Each downstream control carries a
//! request-sequence token; a response that arrives after a newer request was
//! issued for the same control is discarded instead of clobbering it.

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::form::{BindError, SelectForm, DISTRICT_ID, PROVINCE_ID, WARD_ID};
use crate::lookup::{LocationLookup, LookupError, OptionItem};
use crate::select::SelectControl;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Mutable cascade state, guarded by one lock so handlers can release it
/// while a lookup is in flight.
#[derive(Debug)]
struct State {
    province: SelectControl,
    district: SelectControl,
    ward: SelectControl,
    /// One-shot restore slot for the district, captured at construction.
    /// `None` forever after first consumption.
    pending_district: Option<String>,
    /// One-shot restore slot for the ward.
    pending_ward: Option<String>,
    /// Sequence token of the latest district request issued.
    district_seq: u64,
    /// Sequence token of the latest ward request issued.
    ward_seq: u64,
}

fn captured_value(control: &SelectControl) -> Option<String> {
    if control.value().is_empty() {
        None
    } else {
        Some(control.value().to_owned())
    }
}

// ---------------------------------------------------------------------------
// CascadingSelector
// ---------------------------------------------------------------------------

/// Binds three ordered selection controls and, on each upstream change,
/// replaces the downstream option lists with the ordered result of a remote
/// lookup.
///
/// The component owns its controls for as long as it is active. District and
/// ward values present at construction are captured and re-applied exactly
/// once, the first time their control is repopulated.
///
/// # Examples
///
/// ```
/// use cascade_select::cascade::CascadingSelector;
/// use cascade_select::lookup::{OptionItem, StaticLookup};
/// use cascade_select::select::{SelectControl, SelectOption};
///
/// # tokio_test::block_on(async {
/// let lookup = StaticLookup::new()
///     .with_districts("1", vec![OptionItem::new("10", "A")]);
/// let province = SelectControl::new("id_province")
///     .with_options(vec![SelectOption::placeholder(), SelectOption::new("1", "Hà Nội")]);
/// let selector = CascadingSelector::new(
///     lookup,
///     province,
///     SelectControl::new("id_district"),
///     SelectControl::new("id_ward"),
/// );
/// selector.set_province("1").await;
/// assert_eq!(selector.district().await.option_values(), vec!["", "10"]);
/// # });
/// ```
pub struct CascadingSelector {
    lookup: Box<dyn LocationLookup>,
    state: Mutex<State>,
}

impl std::fmt::Debug for CascadingSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadingSelector")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CascadingSelector {
    /// Create a selector over the three controls.
    ///
    /// Non-empty district and ward values are captured into the one-shot
    /// restore slots before anything else happens.
    pub fn new(
        lookup: impl LocationLookup + 'static,
        province: SelectControl,
        district: SelectControl,
        ward: SelectControl,
    ) -> Self {
        let pending_district = captured_value(&district);
        let pending_ward = captured_value(&ward);
        Self {
            lookup: Box::new(lookup),
            state: Mutex::new(State {
                province,
                district,
                ward,
                pending_district,
                pending_ward,
                district_seq: 0,
                ward_seq: 0,
            }),
        }
    }

    /// Bind against a form by the conventional control ids.
    ///
    /// The province control is required. A missing district or ward control
    /// is tolerated: an empty stand-in is created, so there is nothing to
    /// capture for restore.
    pub fn from_form(
        lookup: impl LocationLookup + 'static,
        form: &mut SelectForm,
    ) -> Result<Self, BindError> {
        let province = form.take(PROVINCE_ID).ok_or_else(|| BindError::MissingControl {
            id: PROVINCE_ID.to_owned(),
        })?;
        let district = form
            .take(DISTRICT_ID)
            .unwrap_or_else(|| SelectControl::new(DISTRICT_ID));
        let ward = form
            .take(WARD_ID)
            .unwrap_or_else(|| SelectControl::new(WARD_ID));
        Ok(Self::new(lookup, province, district, ward))
    }

    /// Kick off the cascade for a form loaded with prior state: if the
    /// province control already holds a non-empty value, run the province
    /// handler once, as if the value had just been selected.
    pub async fn start(&self) {
        self.province_changed().await;
    }

    /// Select a province value and run the province handler.
    ///
    /// A value with no matching option clears the selection, in which case
    /// the handler leaves the downstream controls untouched.
    pub async fn set_province(&self, value: impl Into<String>) {
        self.state.lock().await.province.set_value(value);
        self.province_changed().await;
    }

    /// Select a district value and run the district handler.
    pub async fn set_district(&self, value: impl Into<String>) {
        self.state.lock().await.district.set_value(value);
        self.district_changed().await;
    }

    /// Snapshot of the province control.
    pub async fn province(&self) -> SelectControl {
        self.state.lock().await.province.clone()
    }

    /// Snapshot of the district control.
    pub async fn district(&self) -> SelectControl {
        self.state.lock().await.district.clone()
    }

    /// Snapshot of the ward control.
    pub async fn ward(&self) -> SelectControl {
        self.state.lock().await.ward.clone()
    }

    /// Give the controls back, e.g. at page teardown.
    pub fn into_controls(self) -> (SelectControl, SelectControl, SelectControl) {
        let state = self.state.into_inner();
        (state.province, state.district, state.ward)
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    /// React to a change of the province control's value.
    ///
    /// An empty province is a no-op: existing district and ward options are
    /// left in place, stale. Otherwise both downstream controls are reset to
    /// the placeholder before the lookup future is first polled, then the
    /// district list is populated from the response, in order.
    pub async fn province_changed(&self) {
        let (province_id, token) = {
            let mut state = self.state.lock().await;
            let province_id = state.province.value().to_owned();
            if province_id.is_empty() {
                debug!("province cleared, leaving downstream options untouched");
                return;
            }
            state.district.reset_to_placeholder();
            state.ward.reset_to_placeholder();
            state.district_seq += 1;
            // The ward list was just reset too, so any in-flight ward
            // response must not repopulate it.
            state.ward_seq += 1;
            (province_id, state.district_seq)
        };

        let items = self.districts_or_empty(&province_id).await;

        let restore = {
            let mut state = self.state.lock().await;
            if token != state.district_seq {
                debug!(%province_id, "discarding stale district response");
                return;
            }
            for item in items {
                state.district.push_option(item.id, item.title);
            }
            match state.pending_district.take() {
                Some(value) => {
                    state.district.set_value(value);
                    true
                }
                None => false,
            }
        };

        // Chain into the district handler so the ward cascade runs for the
        // restored value. The handler no-ops if the restore did not match
        // any option.
        if restore {
            self.district_changed().await;
        }
    }

    /// React to a change of the district control's value.
    ///
    /// Same shape as the province handler, one level down. The ward is a
    /// leaf: its restore applies the value and consumes the slot without
    /// chaining further.
    pub async fn district_changed(&self) {
        let (district_id, token) = {
            let mut state = self.state.lock().await;
            let district_id = state.district.value().to_owned();
            if district_id.is_empty() {
                debug!("district cleared, leaving ward options untouched");
                return;
            }
            state.ward.reset_to_placeholder();
            state.ward_seq += 1;
            (district_id, state.ward_seq)
        };

        let items = self.wards_or_empty(&district_id).await;

        let mut state = self.state.lock().await;
        if token != state.ward_seq {
            debug!(%district_id, "discarding stale ward response");
            return;
        }
        for item in items {
            state.ward.push_option(item.id, item.title);
        }
        if let Some(value) = state.pending_ward.take() {
            state.ward.set_value(value);
        }
    }

    // -----------------------------------------------------------------------
    // Lookup plumbing
    // -----------------------------------------------------------------------

    async fn districts_or_empty(&self, province_id: &str) -> Vec<OptionItem> {
        collapse_failure(
            self.lookup.districts(province_id).await,
            "district",
            province_id,
        )
    }

    async fn wards_or_empty(&self, district_id: &str) -> Vec<OptionItem> {
        collapse_failure(self.lookup.wards(district_id).await, "ward", district_id)
    }
}

/// Collapse a lookup failure to an empty item list. The user only ever sees
/// an unpopulated control; the log line is for operators.
fn collapse_failure(
    result: Result<Vec<OptionItem>, LookupError>,
    level: &str,
    parent_id: &str,
) -> Vec<OptionItem> {
    match result {
        Ok(items) => items,
        Err(error) => {
            warn!(%error, level, parent_id, "lookup failed, treating as empty");
            Vec::new()
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    use super::*;
    use crate::lookup::StaticLookup;
    use crate::select::SelectOption;

    fn province_with(values: &[(&str, &str)]) -> SelectControl {
        let mut options = vec![SelectOption::placeholder()];
        options.extend(values.iter().map(|(v, l)| SelectOption::new(*v, *l)));
        SelectControl::new(PROVINCE_ID).with_options(options)
    }

    fn two_level_lookup() -> StaticLookup {
        StaticLookup::new()
            .with_districts(
                "1",
                vec![OptionItem::new("10", "A"), OptionItem::new("11", "B")],
            )
            .with_wards("10", vec![OptionItem::new("100", "X")])
    }

    fn selector(lookup: StaticLookup) -> CascadingSelector {
        CascadingSelector::new(
            lookup,
            province_with(&[("1", "P1"), ("2", "P2")]),
            SelectControl::new(DISTRICT_ID),
            SelectControl::new(WARD_ID),
        )
    }

    // -----------------------------------------------------------------------
    // Province handler
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn province_change_populates_district() {
        let s = selector(two_level_lookup());
        s.set_province("1").await;

        let district = s.district().await;
        assert_eq!(district.option_values(), vec!["", "10", "11"]);
        assert_eq!(district.option_labels(), vec!["---------", "A", "B"]);
        assert_eq!(s.ward().await.option_values(), vec![""]);
    }

    #[tokio::test]
    async fn empty_lookup_leaves_placeholder_only() {
        let s = selector(StaticLookup::new());
        s.set_province("1").await;

        assert_eq!(s.district().await.option_values(), vec![""]);
        assert_eq!(s.district().await.option_labels(), vec!["---------"]);
    }

    #[tokio::test]
    async fn empty_province_is_a_no_op() {
        let s = selector(two_level_lookup());
        s.set_province("1").await;
        s.set_district("10").await;

        // Clearing the province leaves the downstream options stale.
        s.set_province("").await;
        assert_eq!(s.district().await.option_values(), vec!["", "10", "11"]);
        assert_eq!(s.ward().await.option_values(), vec!["", "100"]);
    }

    #[tokio::test]
    async fn same_province_twice_is_idempotent() {
        let s = selector(two_level_lookup());
        s.set_province("1").await;
        let first = s.district().await;
        s.set_province("1").await;
        assert_eq!(s.district().await, first);
    }

    #[tokio::test]
    async fn province_change_resets_previous_ward() {
        let s = selector(two_level_lookup());
        s.set_province("1").await;
        s.set_district("10").await;
        assert_eq!(s.ward().await.option_values(), vec!["", "100"]);

        // Province 2 has no districts; the ward must still be reset.
        s.set_province("2").await;
        assert_eq!(s.district().await.option_values(), vec![""]);
        assert_eq!(s.ward().await.option_values(), vec![""]);
    }

    // -----------------------------------------------------------------------
    // District handler
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn district_change_populates_ward_without_restore() {
        let s = selector(two_level_lookup());
        s.set_province("1").await;
        s.set_district("10").await;

        let ward = s.ward().await;
        assert_eq!(ward.option_values(), vec!["", "100"]);
        assert_eq!(ward.option_labels(), vec!["---------", "X"]);
        // No pending ward existed, so the selection stays empty.
        assert_eq!(ward.value(), "");
    }

    #[tokio::test]
    async fn district_without_wards_leaves_placeholder() {
        let s = selector(two_level_lookup());
        s.set_province("1").await;
        s.set_district("11").await;
        assert_eq!(s.ward().await.option_values(), vec![""]);
    }

    // -----------------------------------------------------------------------
    // Restore-once
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn restores_district_and_ward_once() {
        let province = province_with(&[("1", "P1"), ("2", "P2")]).with_value("1");
        let district = SelectControl::new(DISTRICT_ID)
            .with_options(vec![SelectOption::new("10", "A")])
            .with_value("10");
        let ward = SelectControl::new(WARD_ID)
            .with_options(vec![SelectOption::new("100", "X")])
            .with_value("100");
        let s = CascadingSelector::new(two_level_lookup(), province, district, ward);

        s.start().await;
        assert_eq!(s.district().await.value(), "10");
        assert_eq!(s.ward().await.value(), "100");

        // A later province change must not reapply the captured values.
        s.set_province("1").await;
        assert_eq!(s.district().await.value(), "");
        s.set_district("10").await;
        assert_eq!(s.ward().await.value(), "");
    }

    #[tokio::test]
    async fn start_without_province_value_does_nothing() {
        let s = selector(two_level_lookup());
        s.start().await;
        assert!(s.district().await.options().is_empty());
        assert!(s.ward().await.options().is_empty());
    }

    #[tokio::test]
    async fn restore_value_missing_from_options_clears_selection() {
        let province = province_with(&[("1", "P1")]).with_value("1");
        let district = SelectControl::new(DISTRICT_ID)
            .with_options(vec![SelectOption::new("99", "Gone")])
            .with_value("99");
        let s = CascadingSelector::new(
            two_level_lookup(),
            province,
            district,
            SelectControl::new(WARD_ID),
        );

        s.start().await;
        // "99" is not among province 1's districts: the selection clears and
        // the ward cascade does not run.
        assert_eq!(s.district().await.value(), "");
        assert_eq!(s.ward().await.option_values(), vec![""]);
    }

    // -----------------------------------------------------------------------
    // Form binding
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn from_form_requires_province() {
        let mut form = SelectForm::new().with_control(SelectControl::new(DISTRICT_ID));
        let err = CascadingSelector::from_form(StaticLookup::new(), &mut form).unwrap_err();
        assert_eq!(
            err,
            BindError::MissingControl {
                id: PROVINCE_ID.to_owned()
            }
        );
    }

    #[tokio::test]
    async fn from_form_tolerates_missing_downstream_controls() {
        let mut form = SelectForm::new().with_control(province_with(&[("1", "P1")]));
        let s = CascadingSelector::from_form(two_level_lookup(), &mut form).unwrap();
        s.set_province("1").await;
        assert_eq!(s.district().await.option_values(), vec!["", "10", "11"]);
    }

    #[tokio::test]
    async fn into_controls_returns_current_state() {
        let s = selector(two_level_lookup());
        s.set_province("1").await;
        let (province, district, ward) = s.into_controls();
        assert_eq!(province.value(), "1");
        assert_eq!(district.option_values(), vec!["", "10", "11"]);
        assert_eq!(ward.option_values(), vec![""]);
    }

    // -----------------------------------------------------------------------
    // Stale responses
    // -----------------------------------------------------------------------

    /// Lookup whose district responses for one province block until released.
    struct GatedLookup {
        inner: StaticLookup,
        slow_province: String,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl LocationLookup for GatedLookup {
        async fn districts(&self, province_id: &str) -> Result<Vec<OptionItem>, LookupError> {
            if province_id == self.slow_province {
                self.gate.notified().await;
            }
            self.inner.districts(province_id).await
        }

        async fn wards(&self, district_id: &str) -> Result<Vec<OptionItem>, LookupError> {
            self.inner.wards(district_id).await
        }
    }

    #[tokio::test]
    async fn late_response_for_superseded_province_is_discarded() {
        let gate = Arc::new(Notify::new());
        let lookup = GatedLookup {
            inner: StaticLookup::new()
                .with_districts("1", vec![OptionItem::new("10", "Old")])
                .with_districts("2", vec![OptionItem::new("20", "New")]),
            slow_province: "1".to_owned(),
            gate: Arc::clone(&gate),
        };
        let s = Arc::new(CascadingSelector::new(
            lookup,
            province_with(&[("1", "P1"), ("2", "P2")]),
            SelectControl::new(DISTRICT_ID),
            SelectControl::new(WARD_ID),
        ));

        let slow = tokio::spawn({
            let s = Arc::clone(&s);
            async move { s.set_province("1").await }
        });
        tokio::task::yield_now().await;

        // Second change overtakes the first while it is blocked.
        s.set_province("2").await;
        gate.notify_one();
        slow.await.unwrap();

        let district = s.district().await;
        assert_eq!(district.option_values(), vec!["", "20"]);
        assert_eq!(district.option_labels(), vec!["---------", "New"]);
    }

    /// Lookup whose ward responses for one district block until released.
    struct WardGatedLookup {
        inner: StaticLookup,
        slow_district: String,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl LocationLookup for WardGatedLookup {
        async fn districts(&self, province_id: &str) -> Result<Vec<OptionItem>, LookupError> {
            self.inner.districts(province_id).await
        }

        async fn wards(&self, district_id: &str) -> Result<Vec<OptionItem>, LookupError> {
            if district_id == self.slow_district {
                self.gate.notified().await;
            }
            self.inner.wards(district_id).await
        }
    }

    #[tokio::test]
    async fn late_ward_response_is_discarded_after_province_change() {
        let gate = Arc::new(Notify::new());
        let lookup = WardGatedLookup {
            inner: StaticLookup::new()
                .with_districts("1", vec![OptionItem::new("10", "A")])
                .with_wards("10", vec![OptionItem::new("100", "X")]),
            slow_district: "10".to_owned(),
            gate: Arc::clone(&gate),
        };
        let s = Arc::new(CascadingSelector::new(
            lookup,
            province_with(&[("1", "P1"), ("2", "P2")]),
            SelectControl::new(DISTRICT_ID),
            SelectControl::new(WARD_ID),
        ));
        s.set_province("1").await;

        let slow = tokio::spawn({
            let s = Arc::clone(&s);
            async move { s.set_district("10").await }
        });
        tokio::task::yield_now().await;

        // The province change resets the ward while its lookup is in flight;
        // the late response must not repopulate the fresh placeholder.
        s.set_province("2").await;
        gate.notify_one();
        slow.await.unwrap();

        assert_eq!(s.ward().await.option_values(), vec![""]);
        assert_eq!(s.district().await.option_values(), vec![""]);
    }
}
