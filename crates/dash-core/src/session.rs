//! Session-scoped state behind a single serialized gate.
//!
//! A [`Session`] owns the base table and the interaction state. Every event
//! takes the lock, applies the transition (or the toggle mutation), derives
//! the output and releases the lock, so no two events ever interleave.

use std::borrow::Cow;
use std::sync::{Mutex, MutexGuard};

use dash_model::{RowId, Schema, Table};
use serde::{Deserialize, Serialize};

use crate::controls::ControlSet;
use crate::derive::{DerivedOutput, ViewLayout, derive};
use crate::error::{EventError, SessionError};
use crate::filter::coerce_value;
use crate::state::{InteractionEvent, InteractionState};
use crate::toggle::{ToggleOutcome, on_click};

/// Anything the render target can send back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UiEvent {
    /// A click on a chart point carrying the target row id.
    Click {
        #[serde(rename = "click")]
        row_id: RowId,
    },
    Interaction(InteractionEvent),
}

impl UiEvent {
    pub fn click(row_id: RowId) -> Self {
        UiEvent::Click { row_id }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Click { .. } => "click",
            UiEvent::Interaction(event) => event.name(),
        }
    }
}

impl From<InteractionEvent> for UiEvent {
    fn from(event: InteractionEvent) -> Self {
        UiEvent::Interaction(event)
    }
}

/// One rendered cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Number of events processed so far; 0 for the initial render.
    pub sequence: u64,
    pub event: Option<&'static str>,
    /// Why the event was dropped, when it was.
    pub rejected: Option<String>,
    pub toggle: Option<ToggleOutcome>,
    #[serde(flatten)]
    pub output: DerivedOutput,
}

#[derive(Debug)]
struct SessionState {
    table: Table,
    state: InteractionState,
    sequence: u64,
}

#[derive(Debug)]
pub struct Session {
    layout: ViewLayout,
    schema: Schema,
    inner: Mutex<SessionState>,
}

impl Session {
    pub fn new(table: Table, layout: ViewLayout) -> Self {
        let state = layout.initial_state();
        Self {
            schema: table.schema().clone(),
            layout,
            inner: Mutex::new(SessionState {
                table,
                state,
                sequence: 0,
            }),
        }
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn controls(&self) -> ControlSet {
        self.layout.controls(&self.schema)
    }

    /// Derive the current output without applying an event.
    pub fn render(&self) -> Result<Frame, SessionError> {
        let inner = self.lock()?;
        Ok(self.frame(&inner, None, None, None))
    }

    /// Process one event and derive the resulting output.
    ///
    /// Rejected interaction events leave the state as it was; the frame
    /// carries the reason. A click outside any addressable row is a no-op.
    pub fn dispatch(&self, event: &UiEvent) -> Result<Frame, SessionError> {
        let mut inner = self.lock()?;
        inner.sequence += 1;
        let span = tracing::debug_span!("dispatch", sequence = inner.sequence, event = event.name());
        let _guard = span.enter();

        let mut rejected = None;
        let mut toggle = None;
        match event {
            UiEvent::Click { row_id } => {
                let outcome = match &self.layout.toggle {
                    Some(control) => {
                        on_click(&mut inner.table, row_id.as_str(), control.column.as_str())
                    }
                    None => ToggleOutcome::NoTarget,
                };
                match &outcome {
                    ToggleOutcome::Toggled { from, to, .. } => {
                        tracing::debug!(row = %row_id, %from, %to, "category toggled");
                    }
                    ToggleOutcome::NoTarget => {
                        tracing::debug!(row = %row_id, "click outside addressable targets");
                    }
                }
                toggle = Some(outcome);
            }
            UiEvent::Interaction(interaction) => {
                let next = self
                    .check_dropdown(interaction)
                    .and_then(|interaction| inner.state.apply(&self.schema, &interaction));
                match next {
                    Ok(next) => inner.state = next,
                    Err(error) => {
                        tracing::warn!(%error, "event rejected, keeping previous state");
                        rejected = Some(error.to_string());
                    }
                }
            }
        }

        let frame = self.frame(&inner, Some(event.name()), rejected, toggle);
        tracing::debug!(
            rows = frame.output.view.rows.len(),
            charts = frame.output.charts.len(),
            "derived"
        );
        Ok(frame)
    }

    /// Snapshot of the interaction state.
    pub fn state(&self) -> Result<InteractionState, SessionError> {
        Ok(self.lock()?.state.clone())
    }

    /// Snapshot of the base table.
    pub fn table(&self) -> Result<Table, SessionError> {
        Ok(self.lock()?.table.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, SessionError> {
        self.inner.lock().map_err(|_| SessionError::Poisoned)
    }

    /// Coerce a dropdown value to its column's kind and require it to be one
    /// of the options. Other events pass through unchanged.
    fn check_dropdown<'e>(
        &self,
        event: &'e InteractionEvent,
    ) -> Result<Cow<'e, InteractionEvent>, EventError> {
        let (InteractionEvent::SetDropdown { value }, Some(dropdown)) =
            (event, &self.layout.dropdown)
        else {
            return Ok(Cow::Borrowed(event));
        };
        let value = match self.schema.column(dropdown.column.as_str()) {
            Some(column) => coerce_value(column, value)?,
            None => value.clone(),
        };
        if !dropdown.accepts(&value) {
            return Err(EventError::InvalidValue {
                column: dropdown.column.to_string(),
                value: value.to_string(),
                reason: "not one of the dropdown options".to_string(),
            });
        }
        Ok(Cow::Owned(InteractionEvent::SetDropdown { value }))
    }

    fn frame(
        &self,
        inner: &SessionState,
        event: Option<&'static str>,
        rejected: Option<String>,
        toggle: Option<ToggleOutcome>,
    ) -> Frame {
        Frame {
            sequence: inner.sequence,
            event,
            rejected,
            toggle,
            output: derive(&inner.table, &inner.state, &self.layout),
        }
    }
}
