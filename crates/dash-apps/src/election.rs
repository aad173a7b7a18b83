//! Election 2020: click a state on the map to cycle its party.

use std::collections::BTreeMap;

use dash_core::{
    ChoroplethBuilder, ColorScale, Highlight, HistogramBuilder, LocationMode, MapScope,
    Threshold, ToggleControl, ViewLayout,
};
use dash_ingest::LoadOptions;
use dash_model::{Category, CategoryLabels, ColumnName, Result, Value};

pub const NAME: &str = "election";
pub const ID_COLUMN: &str = "state";
pub const PARTY_COLUMN: &str = "party";
pub const VOTES_COLUMN: &str = "electoral votes";
pub const VOTES_TO_WIN: f64 = 270.0;

const DEMOCRAT: (&str, &str) = ("democrat", "#5768AC");
const REPUBLICAN: (&str, &str) = ("republican", "#FA5A50");
const UNSURE: (&str, &str) = ("unsure", "#dddddd");

pub fn party_labels() -> Result<CategoryLabels> {
    CategoryLabels::new(DEMOCRAT.0, REPUBLICAN.0, UNSURE.0)
}

pub fn load_options() -> Result<LoadOptions> {
    Ok(LoadOptions::new()
        .with_id_column(ID_COLUMN)
        .with_category(PARTY_COLUMN, party_labels()?))
}

fn color_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(label, color)| ((*label).to_string(), (*color).to_string()))
        .collect()
}

pub fn layout() -> Result<ViewLayout> {
    let state = ColumnName::new(ID_COLUMN)?;
    let party = ColumnName::new(PARTY_COLUMN)?;
    let votes = ColumnName::new(VOTES_COLUMN)?;

    let map = ChoroplethBuilder {
        id: "choro".to_string(),
        title: None,
        locations: state.clone(),
        location_mode: LocationMode::UsaStates,
        scope: MapScope::Usa,
        color: party.clone(),
        color_scale: ColorScale::Discrete {
            map: color_map(&[DEMOCRAT, REPUBLICAN, UNSURE]),
        },
        hover: vec![state, votes.clone()],
        labels: BTreeMap::new(),
        highlight: Highlight::None,
    };

    // Undecided states do not count towards either side.
    let histogram = HistogramBuilder {
        id: "bar".to_string(),
        title: None,
        x: votes,
        y: party.clone(),
        exclude: vec![Value::Category(Category::Neutral)],
        color_scale: ColorScale::Discrete {
            map: color_map(&[DEMOCRAT, REPUBLICAN]),
        },
        range_x: Some([0.0, 350.0]),
        threshold: Some(Threshold {
            value: VOTES_TO_WIN,
            label: "270 to Win".to_string(),
        }),
    };

    Ok(ViewLayout {
        name: NAME.to_string(),
        toggle: Some(ToggleControl {
            chart: "choro".to_string(),
            column: party,
        }),
        charts: vec![Box::new(map), Box::new(histogram)],
        ..ViewLayout::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_model::Schema;

    #[test]
    fn map_is_clickable() {
        let controls = layout().unwrap().controls(&Schema::default());
        assert_eq!(controls.clickable_charts, vec!["choro".to_string()]);
        assert!(controls.table.is_none());
        assert!(controls.dropdown.is_none());
    }

    #[test]
    fn party_labels_follow_cycle_order() {
        let labels = party_labels().unwrap();
        assert_eq!(labels.label(Category::A), "democrat");
        assert_eq!(labels.label(Category::A.next()), "republican");
        assert_eq!(labels.label(Category::B.next()), "unsure");
    }
}
