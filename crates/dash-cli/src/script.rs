//! Event scripts: JSON Lines files with one [`UiEvent`] per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use dash_core::UiEvent;

pub fn read_events(path: &Path) -> Result<Vec<UiEvent>> {
    let file =
        File::open(path).with_context(|| format!("open event script {}", path.display()))?;
    parse_events(BufReader::new(file))
        .with_context(|| format!("read event script {}", path.display()))
}

/// Parse every non-blank line. Lines starting with `#` are comments.
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<UiEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: UiEvent = serde_json::from_str(line)
            .with_context(|| format!("line {}: not a UI event", index + 1))?;
        events.push(event);
    }
    tracing::debug!(events = events.len(), "event script parsed");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::InteractionEvent;
    use dash_model::RowId;

    #[test]
    fn skips_blank_and_comment_lines() {
        let script = "# year filter\n\n{\"click\":\"FRA\"}\n{\"event\":\"clear_sort\"}\n";
        let events = parse_events(script.as_bytes()).unwrap();
        assert_eq!(
            events,
            vec![
                UiEvent::click(RowId::new("FRA").unwrap()),
                UiEvent::from(InteractionEvent::ClearSort),
            ]
        );
    }

    #[test]
    fn reports_the_bad_line() {
        let script = "{\"event\":\"set_page\",\"index\":1}\n{\"event\":\"zoom\"}\n";
        let err = parse_events(script.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("line 2"));
    }
}
