//! Reactive derivation core.
//!
//! An interaction event updates the [`InteractionState`] (or, for a click,
//! cycles one category cell through the toggle machine). The pure
//! [`derive`] function then maps `(table, state, layout)` to a
//! [`DerivedView`] plus chart specifications. [`Session`] ties the two
//! together behind a single lock so events are processed one at a time.

pub mod chart;
pub mod controls;
pub mod derive;
pub mod error;
pub mod filter;
pub mod session;
pub mod state;
pub mod toggle;

pub use chart::{
    AxisOrder, Bar, BarChart, BarChartBuilder, ChartBuilder, ChartContext, ChartSpec,
    ChoroplethBuilder, ChoroplethChart, ColorScale, Highlight, HistogramBin, HistogramBuilder,
    HistogramChart, HoverItem, LocationMode, MapScope, Region, Threshold,
};
pub use controls::{
    ColumnDefinition, ControlSet, DropdownControl, DropdownOption, TableControl, TableDefinition,
    ToggleControl,
};
pub use derive::{DerivedOutput, DerivedView, PageWindow, ViewLayout, ViewRow, derive};
pub use error::{EventError, SessionError};
pub use filter::{Predicate, parse_filter_query};
pub use session::{Frame, Session, UiEvent};
pub use state::{CellRef, InteractionEvent, InteractionState, SortDirection, SortKey};
pub use toggle::{ToggleOutcome, on_click};
