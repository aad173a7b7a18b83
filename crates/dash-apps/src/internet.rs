//! Internet usage across Europe: an interactive table driving a bar chart
//! and a choropleth.

use std::collections::{BTreeMap, BTreeSet};

use dash_core::{
    AxisOrder, BarChartBuilder, ChoroplethBuilder, ColorScale, Highlight, LocationMode, MapScope,
    TableControl, ViewLayout,
};
use dash_ingest::LoadOptions;
use dash_model::{ColumnName, Result};

pub const NAME: &str = "internet";
/// Country code; the map's location column.
pub const ISO_COLUMN: &str = "iso_alpha3";
pub const YEAR_COLUMN: &str = "year";
/// Column added at load time holding each row's id (`FRA-2019`).
pub const ID_COLUMN: &str = "id";
pub const PAGE_SIZE: usize = 6;
/// Columns the table lets the user hide; every other column stays shown.
pub const HIDEABLE: [&str; 3] = [ISO_COLUMN, YEAR_COLUMN, ID_COLUMN];

const SELECTED_BAR: &str = "#7FDBFF";
const NORMAL_BAR: &str = "#0074D9";

/// A country appears once per survey year, so rows are keyed by both.
pub fn load_options() -> LoadOptions {
    LoadOptions::new()
        .with_id_columns([ISO_COLUMN, YEAR_COLUMN])
        .with_id_as_column(ID_COLUMN)
}

pub fn layout() -> Result<ViewLayout> {
    let country = ColumnName::new("country")?;
    let online_course = ColumnName::new("did online course")?;
    let iso = ColumnName::new(ISO_COLUMN)?;
    let daily = ColumnName::new("internet daily")?;

    let hideable = HIDEABLE
        .into_iter()
        .map(ColumnName::new)
        .collect::<Result<BTreeSet<_>>>()?;

    let bar = BarChartBuilder {
        id: "bar-chart".to_string(),
        title: None,
        x: country.clone(),
        y: online_course.clone(),
        labels: BTreeMap::from([(
            online_course.to_string(),
            "% of Pop took online course".to_string(),
        )]),
        category_order: AxisOrder::TotalAscending,
        highlight: Highlight::MarkerColor {
            selected: SELECTED_BAR.to_string(),
            normal: NORMAL_BAR.to_string(),
        },
    };

    let map = ChoroplethBuilder {
        id: "choropleth".to_string(),
        title: Some("% of Pop that Uses Internet Daily".to_string()),
        locations: iso,
        location_mode: LocationMode::IsoAlpha3,
        scope: MapScope::Europe,
        color: daily.clone(),
        color_scale: ColorScale::Continuous {
            name: "Plasma".to_string(),
        },
        hover: vec![country, daily],
        labels: BTreeMap::new(),
        highlight: Highlight::BorderWidth {
            selected: 5.0,
            normal: 1.0,
        },
    };

    Ok(ViewLayout {
        name: NAME.to_string(),
        table: Some(TableControl {
            id: "datatable-interactivity".to_string(),
            page_size: PAGE_SIZE,
            hideable,
            row_selectable: true,
            row_deletable: true,
        }),
        charts: vec![Box::new(bar), Box::new(map)],
        ..ViewLayout::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_model::{Column, ColumnKind, Schema};

    #[test]
    fn only_key_columns_are_hideable() {
        let schema = Schema::new(
            ["country", "iso_alpha3", "year", "internet daily", "id"]
                .into_iter()
                .map(|name| Column::new(ColumnName::new(name).unwrap(), ColumnKind::Text))
                .collect(),
        )
        .unwrap();
        let controls = layout().unwrap().controls(&schema);
        let table = controls.table.unwrap();
        let hideable: Vec<_> = table
            .columns
            .iter()
            .filter(|column| column.hideable)
            .map(|column| column.name.as_str())
            .collect();
        assert_eq!(hideable, vec!["iso_alpha3", "year", "id"]);
        assert!(table.columns.iter().all(|column| column.sortable && column.deletable));
        assert_eq!(table.page_size, 6);
        assert!(controls.clickable_charts.is_empty());
    }
}
