//! Form container: the surrounding page that creates the controls.
//!
//! [`SelectForm`] holds controls keyed by id so a component can claim the
//! ones it drives. The cascade expects the conventional ids `id_province`,
//! `id_district`, and `id_ward`.

use thiserror::Error;

use crate::select::SelectControl;

/// Id of the province control in a location form.
pub const PROVINCE_ID: &str = "id_province";
/// Id of the district control in a location form.
pub const DISTRICT_ID: &str = "id_district";
/// Id of the ward control in a location form.
pub const WARD_ID: &str = "id_ward";

// ---------------------------------------------------------------------------
// BindError
// ---------------------------------------------------------------------------

/// Raised when a component cannot bind a control it requires.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("missing required control: {id}")]
    MissingControl { id: String },
}

// ---------------------------------------------------------------------------
// SelectForm
// ---------------------------------------------------------------------------

/// An ordered collection of selection controls, addressed by id.
///
/// Insertion order is preserved; ids are expected to be unique and `insert`
/// replaces an existing control with the same id.
#[derive(Debug, Default)]
pub struct SelectForm {
    controls: Vec<SelectControl>,
}

impl SelectForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a control (builder pattern).
    pub fn with_control(mut self, control: SelectControl) -> Self {
        self.insert(control);
        self
    }

    /// Add or replace a control.
    pub fn insert(&mut self, control: SelectControl) {
        if let Some(existing) = self
            .controls
            .iter_mut()
            .find(|c| c.id() == control.id())
        {
            *existing = control;
        } else {
            self.controls.push(control);
        }
    }

    /// Look up a control by id.
    pub fn get(&self, id: &str) -> Option<&SelectControl> {
        self.controls.iter().find(|c| c.id() == id)
    }

    /// Remove and return the control with the given id.
    pub fn take(&mut self, id: &str) -> Option<SelectControl> {
        let index = self.controls.iter().position(|c| c.id() == id)?;
        Some(self.controls.remove(index))
    }

    /// Number of controls in the form.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether the form holds no controls.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_form_is_empty() {
        let form = SelectForm::new();
        assert!(form.is_empty());
        assert_eq!(form.len(), 0);
    }

    #[test]
    fn insert_and_get() {
        let form = SelectForm::new().with_control(SelectControl::new(PROVINCE_ID));
        assert_eq!(form.len(), 1);
        assert!(form.get(PROVINCE_ID).is_some());
        assert!(form.get(DISTRICT_ID).is_none());
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut form = SelectForm::new().with_control(SelectControl::new(WARD_ID));
        let mut replacement = SelectControl::new(WARD_ID);
        replacement.push_option("100", "X");
        form.insert(replacement);
        assert_eq!(form.len(), 1);
        assert_eq!(form.get(WARD_ID).unwrap().options().len(), 1);
    }

    #[test]
    fn take_removes_control() {
        let mut form = SelectForm::new()
            .with_control(SelectControl::new(PROVINCE_ID))
            .with_control(SelectControl::new(DISTRICT_ID));
        let taken = form.take(PROVINCE_ID).unwrap();
        assert_eq!(taken.id(), PROVINCE_ID);
        assert_eq!(form.len(), 1);
        assert!(form.take(PROVINCE_ID).is_none());
    }

    #[test]
    fn bind_error_message() {
        let err = BindError::MissingControl {
            id: PROVINCE_ID.to_owned(),
        };
        assert_eq!(err.to_string(), "missing required control: id_province");
    }
}
