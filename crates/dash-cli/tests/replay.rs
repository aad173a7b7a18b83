//! Script replay through the library side of the CLI.

use std::fs;
use std::path::PathBuf;

use dash_apps::App;
use dash_cli::render::{frame_json, frame_text};
use dash_cli::script::read_events;
use tempfile::TempDir;

const ELECTION: &str = "\
state,party,electoral votes
CA,democrat,55
TX,republican,38
FL,unsure,29
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn replays_clicks_and_rejections() {
    let dir = TempDir::new().expect("temp dir");
    let csv = write(&dir, "politics.csv", ELECTION);
    let script = write(
        &dir,
        "events.jsonl",
        "{\"click\":\"TX\"}\n{\"event\":\"set_sort\",\"column\":\"governor\"}\n{\"click\":\"PR\"}\n",
    );

    let session = App::Election.open(&csv).expect("open");
    let events = read_events(&script).expect("script");
    assert_eq!(events.len(), 3);

    let frames: Vec<_> = events
        .iter()
        .map(|event| session.dispatch(event).expect("dispatch"))
        .collect();
    assert!(frames[0].rejected.is_none());
    assert!(frames[1].rejected.is_some());

    let table = session.table().expect("table");
    let text = frame_text(&frames[0], &table, session.layout());
    assert!(text.starts_with("frame 1 (click)\n"));
    assert!(text.contains("toggled TX: republican -> unsure"));
    assert!(text.contains("bar [histogram]: democrat=55\n"));

    let text = frame_text(&frames[1], &table, session.layout());
    insta::assert_snapshot!(text.lines().nth(1).unwrap_or_default(), @"rejected: unknown column 'governor'");
}

#[test]
fn json_frames_are_single_lines() {
    let dir = TempDir::new().expect("temp dir");
    let csv = write(&dir, "politics.csv", ELECTION);
    let session = App::Election.open(&csv).expect("open");
    let frame = session.render().expect("render");

    let line = frame_json(&frame).expect("json");
    assert!(!line.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).expect("parse back");
    assert_eq!(value["sequence"], 0);
    assert_eq!(value["charts"][0]["mark"], "choropleth");
    assert_eq!(value["charts"][1]["threshold"]["label"], "270 to Win");
    assert_eq!(value["view"]["rows"].as_array().map(Vec::len), Some(3));
}

#[test]
fn page_override_shows_page_footer() {
    let dir = TempDir::new().expect("temp dir");
    let csv = write(&dir, "politics.csv", ELECTION);
    let layout = App::Election.layout().expect("layout").with_page_size(2);
    let session = App::Election.open_with(&csv, layout).expect("open");
    let frame = session.render().expect("render");
    let text = frame_text(&frame, &session.table().expect("table"), session.layout());
    assert!(text.contains("page 1/2: rows 1-2 of 3"));
}

#[test]
fn missing_script_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = read_events(&dir.path().join("absent.jsonl")).unwrap_err();
    assert!(err.to_string().contains("open event script"));
}
