//! # cascade-select
//!
//! Event-driven cascading selection for administrative location forms:
//! province → district → ward.
//!
//! Changing an upstream control replaces the downstream option lists with the
//! ordered result of an asynchronous remote lookup. Values already present
//! when the component is created (a form reloaded with prior state) are
//! restored exactly once, the first time their control is repopulated.
//!
//! ## Core Systems
//!
//! - **[`select`]** — Selection-control model: ordered options, one value,
//!   placeholder reset
//! - **[`form`]** — Control container the cascade binds against
//! - **[`lookup`]** — The remote-lookup seam: HTTP backend and an in-memory
//!   backend for tests
//! - **[`cascade`]** — The [`CascadingSelector`] component itself
//!
//! ## Example
//!
//! ```no_run
//! use cascade_select::cascade::CascadingSelector;
//! use cascade_select::form::SelectForm;
//! use cascade_select::lookup::HttpLookup;
//! use cascade_select::select::{SelectControl, SelectOption};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut form = SelectForm::new()
//!     .with_control(
//!         SelectControl::new("id_province")
//!             .with_options(vec![SelectOption::placeholder(), SelectOption::new("1", "Hà Nội")])
//!             .with_value("1"),
//!     )
//!     .with_control(SelectControl::new("id_district"))
//!     .with_control(SelectControl::new("id_ward"));
//!
//! let lookup = HttpLookup::new("https://example.com")?;
//! let selector = CascadingSelector::from_form(lookup, &mut form)?;
//! selector.start().await;
//! # Ok(())
//! # }
//! ```

// Control model
pub mod form;
pub mod select;

// Data source
pub mod lookup;

// The component
pub mod cascade;

pub use cascade::CascadingSelector;
pub use form::{BindError, SelectForm};
pub use lookup::{HttpLookup, LocationLookup, LookupError, OptionItem, StaticLookup};
pub use select::{SelectControl, SelectOption, PLACEHOLDER_LABEL};
