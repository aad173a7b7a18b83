//! Bee colonies affected by varroa mites, one year at a time.

use std::collections::BTreeMap;

use dash_core::{
    ChoroplethBuilder, ColorScale, DropdownControl, DropdownOption, Highlight, LocationMode,
    MapScope, Predicate, ViewLayout,
};
use dash_ingest::LoadOptions;
use dash_model::{ColumnName, Result, Value};

pub const NAME: &str = "bees";
pub const YEARS: [u16; 4] = [2015, 2016, 2017, 2018];
pub const DEFAULT_YEAR: u16 = 2015;
pub const CAPTION: &str = "The year chosen by user was: {}";

const IMPACT_COLUMN: &str = "Pct of Colonies Impacted";

/// The dataset has no natural key; rows are addressed by position.
pub fn load_options() -> LoadOptions {
    LoadOptions::new()
}

fn year(value: u16) -> Value {
    Value::Number(f64::from(value))
}

pub fn layout() -> Result<ViewLayout> {
    let impact = ColumnName::new(IMPACT_COLUMN)?;

    let dropdown = DropdownControl {
        id: "slct_year".to_string(),
        column: ColumnName::new("Year")?,
        options: YEARS
            .iter()
            .map(|&value| DropdownOption {
                label: value.to_string(),
                value: year(value),
            })
            .collect(),
        default: year(DEFAULT_YEAR),
    };

    let map = ChoroplethBuilder {
        id: "my_bee_map".to_string(),
        title: None,
        locations: ColumnName::new("state_code")?,
        location_mode: LocationMode::UsaStates,
        scope: MapScope::Usa,
        color: impact.clone(),
        color_scale: ColorScale::Continuous {
            name: "YlOrRd".to_string(),
        },
        hover: vec![ColumnName::new("State")?, impact.clone()],
        labels: BTreeMap::from([(impact.to_string(), "% of Bee Colonies".to_string())]),
        highlight: Highlight::None,
    };

    Ok(ViewLayout {
        name: NAME.to_string(),
        base_filter: vec![(
            ColumnName::new("Affected by")?,
            Predicate::Eq(Value::text("Varroa_mites")),
        )],
        dropdown: Some(dropdown),
        caption: Some(CAPTION.to_string()),
        charts: vec![Box::new(map)],
        ..ViewLayout::default()
    })
}
