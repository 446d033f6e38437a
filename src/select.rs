//! Selection-control model: ordered options and a single selected value.
//!
//! [`SelectControl`] mirrors an HTML `<select>` element closely enough that
//! cascade behavior can be tested without a browser: options are ordered
//! (value, label) pairs, at most one value is selected, and assigning a value
//! that matches no option clears the selection.

// ---------------------------------------------------------------------------
// SelectOption
// ---------------------------------------------------------------------------

/// One (value, label) entry in a control's option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value. Empty for the placeholder.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl SelectOption {
    /// Create an option from a value and a label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The placeholder entry: empty value, `"---------"` label.
    pub fn placeholder() -> Self {
        Self::new("", PLACEHOLDER_LABEL)
    }
}

/// Label of the placeholder option that heads every resettable list.
pub const PLACEHOLDER_LABEL: &str = "---------";

// ---------------------------------------------------------------------------
// SelectControl
// ---------------------------------------------------------------------------

/// An identifiable selection control holding zero or one selected value from
/// an ordered option list.
///
/// # Examples
///
/// ```
/// use cascade_select::select::SelectControl;
///
/// let mut district = SelectControl::new("id_district");
/// district.reset_to_placeholder();
/// district.push_option("10", "A");
/// district.set_value("10");
/// assert_eq!(district.value(), "10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    id: String,
    options: Vec<SelectOption>,
    value: String,
}

impl SelectControl {
    /// Create a control with the given id and no options.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: Vec::new(),
            value: String::new(),
        }
    }

    /// Set the option list (builder pattern). The selection is re-checked
    /// against the new list.
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        let value = std::mem::take(&mut self.value);
        self.set_value(value);
        self
    }

    /// Set the selected value (builder pattern). Clears to empty if no
    /// option matches, like `set_value`.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// The control's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The currently selected value. Empty string means no selection.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The ordered option list.
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// The option values, in order. Convenient for assertions.
    pub fn option_values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    /// The option labels, in order.
    pub fn option_labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    /// Select a value. Following `<select>` semantics, a value that matches
    /// no option (including on an empty option list) clears the selection.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.options.iter().any(|o| o.value == value) {
            self.value = value;
        } else {
            self.value.clear();
        }
    }

    /// Append one option to the end of the list.
    pub fn push_option(&mut self, value: impl Into<String>, label: impl Into<String>) {
        self.options.push(SelectOption::new(value, label));
    }

    /// Replace the entire option list with the single placeholder option and
    /// clear the selection.
    pub fn reset_to_placeholder(&mut self) {
        self.options.clear();
        self.options.push(SelectOption::placeholder());
        self.value.clear();
    }
}

// ===========================================================================
// Tests
// ===========================================================================
