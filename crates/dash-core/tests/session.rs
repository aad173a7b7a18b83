//! Event-loop tests for the session gate.

use std::collections::BTreeMap;

use dash_core::{
    ChartSpec, ColorScale, DropdownControl, DropdownOption, HistogramBuilder, InteractionEvent,
    Predicate, Session, Threshold, ToggleControl, ToggleOutcome, UiEvent, ViewLayout,
};
use dash_model::{
    Category, CategoryLabels, Column, ColumnKind, ColumnName, Row, RowId, Schema, Table, Value,
};

fn name(s: &str) -> ColumnName {
    ColumnName::new(s).unwrap()
}

fn election_table() -> Table {
    let labels = CategoryLabels::new("democrat", "republican", "unsure").unwrap();
    let schema = Schema::new(vec![
        Column::new(name("state"), ColumnKind::Text),
        Column::new(name("party"), ColumnKind::Category(labels)),
        Column::new(name("electoral votes"), ColumnKind::Number),
    ])
    .unwrap();
    let mut table = Table::new(schema);
    for (state, party, votes) in [
        ("CA", Category::A, 55.0),
        ("TX", Category::B, 38.0),
        ("PA", Category::Neutral, 20.0),
        ("NY", Category::A, 29.0),
    ] {
        table
            .push_row(
                Row::new(RowId::new(state).unwrap())
                    .with(name("state"), Value::text(state))
                    .with(name("party"), Value::Category(party))
                    .with(name("electoral votes"), Value::Number(votes)),
            )
            .unwrap();
    }
    table
}

fn election_layout() -> ViewLayout {
    ViewLayout {
        name: "election".to_string(),
        toggle: Some(ToggleControl {
            chart: "choro".to_string(),
            column: name("party"),
        }),
        charts: vec![Box::new(HistogramBuilder {
            id: "bar".to_string(),
            title: None,
            x: name("electoral votes"),
            y: name("party"),
            exclude: vec![Value::Category(Category::Neutral)],
            color_scale: ColorScale::Discrete {
                map: BTreeMap::new(),
            },
            range_x: Some([0.0, 350.0]),
            threshold: Some(Threshold {
                value: 270.0,
                label: "270 to Win".to_string(),
            }),
        })],
        ..ViewLayout::default()
    }
}

fn totals(frame: &dash_core::Frame) -> Vec<(String, f64)> {
    let ChartSpec::Histogram(chart) = &frame.output.charts[0] else {
        panic!("expected histogram");
    };
    chart
        .bins
        .iter()
        .map(|bin| (bin.label.clone(), bin.total))
        .collect()
}

fn party_of(session: &Session, id: &str) -> String {
    let table = session.table().unwrap();
    let column = table.schema().column("party").unwrap().clone();
    column.render(table.row(id).unwrap().get("party").unwrap())
}

#[test]
fn initial_render_excludes_neutral_from_histogram() {
    let session = Session::new(election_table(), election_layout());
    let frame = session.render().unwrap();
    assert_eq!(frame.sequence, 0);
    assert_eq!(
        totals(&frame),
        vec![("democrat".to_string(), 84.0), ("republican".to_string(), 38.0)]
    );
}

#[test]
fn click_cycles_party_and_rederives() {
    let session = Session::new(election_table(), election_layout());
    let click = UiEvent::click(RowId::new("CA").unwrap());

    let mut seen = vec![party_of(&session, "CA")];
    for _ in 0..3 {
        session.dispatch(&click).unwrap();
        seen.push(party_of(&session, "CA"));
    }
    insta::assert_snapshot!(seen.join(" -> "), @"democrat -> republican -> unsure -> democrat");

    let frame = session.dispatch(&click).unwrap();
    assert_eq!(frame.sequence, 4);
    assert_eq!(
        frame.toggle,
        Some(ToggleOutcome::Toggled {
            row_id: RowId::new("CA").unwrap(),
            from: Category::A,
            to: Category::B,
        })
    );
    assert_eq!(
        totals(&frame),
        vec![("republican".to_string(), 93.0), ("democrat".to_string(), 29.0)]
    );
}

#[test]
fn click_on_unknown_state_is_silent() {
    let session = Session::new(election_table(), election_layout());
    let before = session.table().unwrap();
    let frame = session
        .dispatch(&UiEvent::click(RowId::new("PR").unwrap()))
        .unwrap();
    assert_eq!(frame.toggle, Some(ToggleOutcome::NoTarget));
    assert!(frame.rejected.is_none());
    assert_eq!(session.table().unwrap(), before);
}

#[test]
fn click_targets_rows_hidden_by_filters() {
    let session = Session::new(election_table(), election_layout());
    session
        .dispatch(&UiEvent::from(InteractionEvent::SetFilter {
            column: "state".to_string(),
            predicate: Predicate::Eq(Value::text("TX")),
        }))
        .unwrap();
    let frame = session
        .dispatch(&UiEvent::click(RowId::new("CA").unwrap()))
        .unwrap();
    assert!(matches!(frame.toggle, Some(ToggleOutcome::Toggled { .. })));
    assert_eq!(party_of(&session, "CA"), "republican");
    assert_eq!(frame.output.view.rows.len(), 1);
}

#[test]
fn invalid_column_keeps_previous_state() {
    let session = Session::new(election_table(), election_layout());
    session
        .dispatch(&UiEvent::from(InteractionEvent::SetPage { index: 1 }))
        .unwrap();
    let before = session.state().unwrap();
    let frame = session
        .dispatch(&UiEvent::from(InteractionEvent::SetSort {
            column: "governor".to_string(),
            direction: Default::default(),
        }))
        .unwrap();
    assert_eq!(frame.rejected.as_deref(), Some("unknown column 'governor'"));
    assert_eq!(session.state().unwrap(), before);
}

#[test]
fn dropdown_value_must_be_an_option() {
    let layout = ViewLayout {
        dropdown: Some(DropdownControl {
            id: "slct_year".to_string(),
            column: name("electoral votes"),
            options: vec![DropdownOption {
                label: "55".to_string(),
                value: Value::Number(55.0),
            }],
            default: Value::Number(55.0),
        }),
        caption: Some("Chosen: {}".to_string()),
        ..election_layout()
    };
    let session = Session::new(election_table(), layout);
    let frame = session.render().unwrap();
    assert_eq!(frame.output.caption.as_deref(), Some("Chosen: 55"));
    assert_eq!(frame.output.view.rows.len(), 1);

    let frame = session
        .dispatch(&UiEvent::from(InteractionEvent::SetDropdown {
            value: Value::Number(12.0),
        }))
        .unwrap();
    assert!(frame.rejected.is_some());
    assert_eq!(frame.output.caption.as_deref(), Some("Chosen: 55"));
}

#[test]
fn dropdown_text_is_read_as_the_column_kind() {
    let layout = ViewLayout {
        dropdown: Some(DropdownControl {
            id: "votes".to_string(),
            column: name("electoral votes"),
            options: [55.0, 38.0]
                .into_iter()
                .map(|votes| DropdownOption {
                    label: votes.to_string(),
                    value: Value::Number(votes),
                })
                .collect(),
            default: Value::Number(55.0),
        }),
        ..election_layout()
    };
    let session = Session::new(election_table(), layout);
    let frame = session
        .dispatch(&UiEvent::from(InteractionEvent::SetDropdown {
            value: Value::text(" 38 "),
        }))
        .unwrap();
    assert!(frame.rejected.is_none());
    assert_eq!(session.state().unwrap().dropdown, Some(Value::Number(38.0)));
    let ids: Vec<_> = frame.output.view.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["TX"]);

    let frame = session
        .dispatch(&UiEvent::from(InteractionEvent::SetDropdown {
            value: Value::text("many"),
        }))
        .unwrap();
    assert!(frame.rejected.is_some());
    assert_eq!(session.state().unwrap().dropdown, Some(Value::Number(38.0)));
}

#[test]
fn ui_events_parse_from_json_lines() {
    let click: UiEvent = serde_json::from_str(r#"{"click":"CA"}"#).unwrap();
    assert_eq!(click, UiEvent::click(RowId::new("CA").unwrap()));
    let page: UiEvent = serde_json::from_str(r#"{"event":"set_page","index":2}"#).unwrap();
    assert_eq!(page, UiEvent::from(InteractionEvent::SetPage { index: 2 }));
}

#[test]
fn session_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
}
