//! Frame output: JSON lines or a terminal table plus a chart summary.

use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table as TextTable};
use dash_core::{ChartSpec, Frame, ToggleOutcome, ViewLayout};
use dash_model::{Category, Table};

pub fn frame_json(frame: &Frame) -> serde_json::Result<String> {
    serde_json::to_string(frame)
}

pub fn apply_table_style(table: &mut TextTable) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Render one frame for a terminal: a heading, the rows of the current page
/// and one line per chart.
pub fn frame_text(frame: &Frame, table: &Table, layout: &ViewLayout) -> String {
    let mut out = String::new();
    let view = &frame.output.view;
    let _ = writeln!(
        out,
        "frame {} ({})",
        frame.sequence,
        frame.event.unwrap_or("initial")
    );
    if let Some(reason) = &frame.rejected {
        let _ = writeln!(out, "rejected: {reason}");
    }
    if let Some(ToggleOutcome::Toggled { row_id, from, to }) = &frame.toggle {
        let _ = writeln!(
            out,
            "toggled {row_id}: {} -> {}",
            category_label(table, layout, *from),
            category_label(table, layout, *to)
        );
    }
    if let Some(caption) = &frame.output.caption {
        let _ = writeln!(out, "{caption}");
    }

    let mut text = TextTable::new();
    apply_table_style(&mut text);
    let mut header = vec![String::new()];
    header.extend(view.columns.iter().map(ToString::to_string));
    text.set_header(header);
    for view_row in view.visible_rows() {
        let row = &table.rows()[view_row.position];
        let mut cells = vec![if view_row.selected { "*" } else { "" }.to_string()];
        cells.extend(view.columns.iter().map(|name| {
            match (table.schema().column(name.as_str()), row.get(name.as_str())) {
                (Some(column), Some(value)) => column.render(value),
                _ => String::new(),
            }
        }));
        text.add_row(cells);
    }
    let _ = writeln!(out, "{text}");
    let page = view.page;
    if page.start < page.end {
        let _ = writeln!(
            out,
            "page {}/{}: rows {}-{} of {}",
            page.index + 1,
            page.page_count,
            page.start + 1,
            page.end,
            view.rows.len()
        );
    } else {
        let _ = writeln!(
            out,
            "page {}/{}: no rows of {}",
            page.index + 1,
            page.page_count,
            view.rows.len()
        );
    }

    for chart in &frame.output.charts {
        let _ = writeln!(out, "{}", chart_line(chart));
    }
    out
}

fn category_label(table: &Table, layout: &ViewLayout, category: Category) -> String {
    layout
        .toggle
        .as_ref()
        .and_then(|toggle| table.schema().column(toggle.column.as_str()))
        .and_then(|column| column.labels())
        .map_or_else(
            || category.as_str().to_string(),
            |labels| labels.label(category).to_string(),
        )
}

fn chart_line(chart: &ChartSpec) -> String {
    let detail = match chart {
        ChartSpec::Bar(bar) => format!(
            "{} bars, {} highlighted",
            bar.bars.len(),
            bar.bars.iter().filter(|b| b.highlighted).count()
        ),
        ChartSpec::Choropleth(map) => format!(
            "{} regions, {} highlighted",
            map.regions.len(),
            map.regions.iter().filter(|r| r.highlighted).count()
        ),
        ChartSpec::Histogram(hist) => hist
            .bins
            .iter()
            .map(|bin| format!("{}={}", bin.label, dash_model::format_number(bin.total)))
            .collect::<Vec<_>>()
            .join(", "),
    };
    format!("{} [{}]: {detail}", chart.id(), chart.mark())
}
