//! Declarative chart specifications and the builders that produce them.
//!
//! A [`ChartSpec`] is plain data for an external renderer. It is rebuilt on
//! every derivation from the filtered and sorted rows of the current view.
//! Selection never changes which points a chart contains; it only sets the
//! `highlighted` hint on a point.

use std::collections::BTreeMap;
use std::fmt;

use dash_model::{Column, ColumnName, Row, Table, Value};
use serde::{Deserialize, Serialize};

use crate::derive::{DerivedView, ViewRow};

// =============================================================================
// SPECIFICATIONS
// =============================================================================

/// A chart, tagged by its mark kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mark", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar(BarChart),
    Choropleth(ChoroplethChart),
    Histogram(HistogramChart),
}

impl ChartSpec {
    pub fn id(&self) -> &str {
        match self {
            ChartSpec::Bar(chart) => &chart.id,
            ChartSpec::Choropleth(chart) => &chart.id,
            ChartSpec::Histogram(chart) => &chart.id,
        }
    }

    pub fn mark(&self) -> &'static str {
        match self {
            ChartSpec::Bar(_) => "bar",
            ChartSpec::Choropleth(_) => "choropleth",
            ChartSpec::Histogram(_) => "histogram",
        }
    }
}

/// How selected points are told apart from the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum Highlight {
    None,
    MarkerColor { selected: String, normal: String },
    BorderWidth { selected: f64, normal: f64 },
}

/// Category axis ordering hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    #[default]
    Data,
    TotalAscending,
    TotalDescending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub row_id: dash_model::RowId,
    pub x: String,
    pub y: Value,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub id: String,
    pub title: Option<String>,
    pub x: ColumnName,
    pub y: ColumnName,
    pub labels: BTreeMap<String, String>,
    pub category_order: AxisOrder,
    pub show_legend: bool,
    pub highlight: Highlight,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationMode {
    IsoAlpha3,
    UsaStates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapScope {
    World,
    Europe,
    Usa,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scale", rename_all = "snake_case")]
pub enum ColorScale {
    /// Display label of a value to a display color.
    Discrete { map: BTreeMap<String, String> },
    /// Named sequential scale.
    Continuous { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverItem {
    pub column: ColumnName,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub row_id: dash_model::RowId,
    pub location: String,
    pub value: Value,
    /// `value` rendered through its column (category labels, trimmed numbers).
    pub label: String,
    pub hover: Vec<HoverItem>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethChart {
    pub id: String,
    pub title: Option<String>,
    pub locations: ColumnName,
    pub location_mode: LocationMode,
    pub scope: MapScope,
    pub color: ColumnName,
    pub color_scale: ColorScale,
    pub labels: BTreeMap<String, String>,
    pub show_legend: bool,
    pub highlight: Highlight,
    pub regions: Vec<Region>,
}

/// A vertical reference line with a label, e.g. a winning threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub category: Value,
    pub label: String,
    /// Sum of the value column over the rows in this bin.
    pub total: f64,
    pub count: usize,
}

/// Horizontal histogram summing one numeric column per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub id: String,
    pub title: Option<String>,
    pub x: ColumnName,
    pub y: ColumnName,
    pub color_scale: ColorScale,
    pub range_x: Option<[f64; 2]>,
    pub threshold: Option<Threshold>,
    pub show_legend: bool,
    pub bins: Vec<HistogramBin>,
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Inputs available to a chart builder: the base table and the derived view.
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'a> {
    pub table: &'a Table,
    pub view: &'a DerivedView,
}

impl<'a> ChartContext<'a> {
    /// Filtered and sorted rows, with their view annotations.
    pub fn rows(&self) -> impl Iterator<Item = (&'a ViewRow, &'a Row)> + use<'a> {
        let table = self.table;
        let view = self.view;
        view.rows
            .iter()
            .map(move |view_row| (view_row, &table.rows()[view_row.position]))
    }

    pub fn column(&self, name: &ColumnName) -> Option<&'a Column> {
        self.table.schema().column(name.as_str())
    }

    fn render(&self, row: &Row, name: &ColumnName) -> String {
        match (self.column(name), row.get(name.as_str())) {
            (Some(column), Some(value)) => column.render(value),
            _ => String::new(),
        }
    }

    fn value(row: &Row, name: &ColumnName) -> Value {
        row.get(name.as_str()).cloned().unwrap_or(Value::Missing)
    }
}

/// Builds one chart from a derived view.
///
/// [`crate::derive`] only calls [`ChartBuilder::build`] when every column in
/// [`ChartBuilder::required_columns`] is visible in the view; otherwise the
/// chart is omitted.
pub trait ChartBuilder: fmt::Debug + Send + Sync {
    fn required_columns(&self) -> Vec<&ColumnName>;

    fn build(&self, ctx: &ChartContext<'_>) -> ChartSpec;
}

#[derive(Debug, Clone)]
pub struct BarChartBuilder {
    pub id: String,
    pub title: Option<String>,
    pub x: ColumnName,
    pub y: ColumnName,
    pub labels: BTreeMap<String, String>,
    pub category_order: AxisOrder,
    pub highlight: Highlight,
}

impl ChartBuilder for BarChartBuilder {
    fn required_columns(&self) -> Vec<&ColumnName> {
        vec![&self.x, &self.y]
    }

    fn build(&self, ctx: &ChartContext<'_>) -> ChartSpec {
        let bars = ctx
            .rows()
            .map(|(view_row, row)| Bar {
                row_id: view_row.id.clone(),
                x: ctx.render(row, &self.x),
                y: ChartContext::value(row, &self.y),
                highlighted: view_row.selected,
            })
            .collect();
        ChartSpec::Bar(BarChart {
            id: self.id.clone(),
            title: self.title.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            labels: self.labels.clone(),
            category_order: self.category_order,
            show_legend: false,
            highlight: self.highlight.clone(),
            bars,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ChoroplethBuilder {
    pub id: String,
    pub title: Option<String>,
    pub locations: ColumnName,
    pub location_mode: LocationMode,
    pub scope: MapScope,
    pub color: ColumnName,
    pub color_scale: ColorScale,
    pub hover: Vec<ColumnName>,
    pub labels: BTreeMap<String, String>,
    pub highlight: Highlight,
}

impl ChartBuilder for ChoroplethBuilder {
    fn required_columns(&self) -> Vec<&ColumnName> {
        let mut columns = vec![&self.locations, &self.color];
        columns.extend(self.hover.iter());
        columns
    }

    fn build(&self, ctx: &ChartContext<'_>) -> ChartSpec {
        let regions = ctx
            .rows()
            .map(|(view_row, row)| Region {
                row_id: view_row.id.clone(),
                location: ctx.render(row, &self.locations),
                value: ChartContext::value(row, &self.color),
                label: ctx.render(row, &self.color),
                hover: self
                    .hover
                    .iter()
                    .map(|column| HoverItem {
                        column: column.clone(),
                        text: ctx.render(row, column),
                    })
                    .collect(),
                highlighted: view_row.selected,
            })
            .collect();
        ChartSpec::Choropleth(ChoroplethChart {
            id: self.id.clone(),
            title: self.title.clone(),
            locations: self.locations.clone(),
            location_mode: self.location_mode,
            scope: self.scope,
            color: self.color.clone(),
            color_scale: self.color_scale.clone(),
            labels: self.labels.clone(),
            show_legend: false,
            highlight: self.highlight.clone(),
            regions,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HistogramBuilder {
    pub id: String,
    pub title: Option<String>,
    /// Numeric column summed per bin.
    pub x: ColumnName,
    /// Category column defining the bins.
    pub y: ColumnName,
    /// Category values left out of the chart.
    pub exclude: Vec<Value>,
    pub color_scale: ColorScale,
    pub range_x: Option<[f64; 2]>,
    pub threshold: Option<Threshold>,
}

impl ChartBuilder for HistogramBuilder {
    fn required_columns(&self) -> Vec<&ColumnName> {
        vec![&self.x, &self.y]
    }

    fn build(&self, ctx: &ChartContext<'_>) -> ChartSpec {
        // Bins appear in order of first occurrence in the view.
        let mut bins: Vec<HistogramBin> = Vec::new();
        for (_, row) in ctx.rows() {
            let category = ChartContext::value(row, &self.y);
            if category.is_missing() || self.exclude.contains(&category) {
                continue;
            }
            let amount = row
                .get(self.x.as_str())
                .and_then(Value::as_number)
                .unwrap_or(0.0);
            match bins.iter_mut().find(|bin| bin.category == category) {
                Some(bin) => {
                    bin.total += amount;
                    bin.count += 1;
                }
                None => bins.push(HistogramBin {
                    label: ctx.render(row, &self.y),
                    category,
                    total: amount,
                    count: 1,
                }),
            }
        }
        ChartSpec::Histogram(HistogramChart {
            id: self.id.clone(),
            title: self.title.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            color_scale: self.color_scale.clone(),
            range_x: self.range_x,
            threshold: self.threshold.clone(),
            show_legend: false,
            bins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{ViewLayout, derive};
    use crate::state::InteractionState;
    use dash_model::{Category, CategoryLabels, ColumnKind, RowId, Schema};

    fn name(s: &str) -> ColumnName {
        ColumnName::new(s).unwrap()
    }

    fn party_table() -> Table {
        let labels = CategoryLabels::new("democrat", "republican", "unsure").unwrap();
        let schema = Schema::new(vec![
            Column::new(name("state"), ColumnKind::Text),
            Column::new(name("votes"), ColumnKind::Number),
            Column::new(name("party"), ColumnKind::Category(labels)),
        ])
        .unwrap();
        let mut table = Table::new(schema);
        for (id, votes, party) in [
            ("TX", 38.0, Value::Category(Category::B)),
            ("CA", 55.0, Value::Category(Category::A)),
            ("FL", 29.0, Value::Category(Category::Neutral)),
            ("NY", 29.0, Value::Category(Category::A)),
            ("OH", 18.0, Value::Category(Category::B)),
        ] {
            table
                .push_row(
                    Row::new(RowId::new(id).unwrap())
                        .with(name("state"), Value::text(id))
                        .with(name("votes"), Value::Number(votes))
                        .with(name("party"), party),
                )
                .unwrap();
        }
        table
    }

    fn histogram() -> HistogramBuilder {
        HistogramBuilder {
            id: "bar".to_string(),
            title: None,
            x: name("votes"),
            y: name("party"),
            exclude: vec![Value::Category(Category::Neutral)],
            color_scale: ColorScale::Continuous {
                name: "Viridis".to_string(),
            },
            range_x: Some([0.0, 350.0]),
            threshold: None,
        }
    }

    #[test]
    fn histogram_bins_follow_first_occurrence_and_skip_excluded() {
        let table = party_table();
        let view = derive(&table, &InteractionState::new(), &ViewLayout::default()).view;
        let chart = histogram().build(&ChartContext {
            table: &table,
            view: &view,
        });

        assert_eq!(chart.id(), "bar");
        assert_eq!(chart.mark(), "histogram");
        let ChartSpec::Histogram(hist) = chart else {
            panic!("expected a histogram");
        };
        let bins: Vec<(&str, f64, usize)> = hist
            .bins
            .iter()
            .map(|bin| (bin.label.as_str(), bin.total, bin.count))
            .collect();
        assert_eq!(
            bins,
            vec![("republican", 56.0, 2), ("democrat", 84.0, 2)]
        );
    }

    #[test]
    fn choropleth_requires_hover_columns() {
        let builder = ChoroplethBuilder {
            id: "choro".to_string(),
            title: None,
            locations: name("state"),
            location_mode: LocationMode::UsaStates,
            scope: MapScope::Usa,
            color: name("party"),
            color_scale: ColorScale::Continuous {
                name: "YlOrRd".to_string(),
            },
            hover: vec![name("votes")],
            labels: BTreeMap::new(),
            highlight: Highlight::None,
        };
        let required: Vec<&str> = builder
            .required_columns()
            .into_iter()
            .map(ColumnName::as_str)
            .collect();
        assert_eq!(required, vec!["state", "party", "votes"]);

        let table = party_table();
        let view = derive(&table, &InteractionState::new(), &ViewLayout::default()).view;
        let ChartSpec::Choropleth(map) = builder.build(&ChartContext {
            table: &table,
            view: &view,
        }) else {
            panic!("expected a choropleth");
        };
        assert_eq!(map.regions[0].label, "republican");
        assert_eq!(map.regions[0].hover[0].text, "38");
    }
}
