//! Bundled dashboard definitions.
//!
//! Each dashboard pairs the options its CSV file is loaded with and the
//! [`ViewLayout`] its session derives from.

pub mod bees;
pub mod election;
pub mod internet;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use dash_core::{ControlSet, Session, ViewLayout};
use dash_ingest::{LoadError, LoadOptions};
use dash_model::{ModelError, Schema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unknown dashboard '{0}' (expected one of: internet, election, bees)")]
    UnknownApp(String),

    #[error("invalid dashboard definition: {0}")]
    Definition(#[from] ModelError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// A bundled dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum App {
    Internet,
    Election,
    Bees,
}

impl App {
    pub const ALL: [App; 3] = [App::Internet, App::Election, App::Bees];

    pub fn name(self) -> &'static str {
        match self {
            App::Internet => "internet",
            App::Election => "election",
            App::Bees => "bees",
        }
    }

    pub fn load_options(self) -> Result<LoadOptions> {
        Ok(match self {
            App::Internet => internet::load_options(),
            App::Election => election::load_options()?,
            App::Bees => bees::load_options(),
        })
    }

    pub fn layout(self) -> Result<ViewLayout> {
        Ok(match self {
            App::Internet => internet::layout()?,
            App::Election => election::layout()?,
            App::Bees => bees::layout()?,
        })
    }

    /// Control definitions for a table with `schema`.
    pub fn controls(self, schema: &Schema) -> Result<ControlSet> {
        Ok(self.layout()?.controls(schema))
    }

    /// Load the dashboard's CSV file and open a session over it.
    pub fn open(self, path: &Path) -> Result<Session> {
        self.open_with(path, self.layout()?)
    }

    /// Like [`App::open`], with a caller-adjusted layout.
    pub fn open_with(self, path: &Path, layout: ViewLayout) -> Result<Session> {
        let table = dash_ingest::load(path, &self.load_options()?)?;
        tracing::info!(app = self.name(), rows = table.len(), "session opened");
        Ok(Session::new(table, layout))
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for App {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        App::ALL
            .into_iter()
            .find(|app| app.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::UnknownApp(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names() {
        assert_eq!("bees".parse::<App>().unwrap(), App::Bees);
        assert_eq!(" Election ".parse::<App>().unwrap(), App::Election);
        assert!(matches!(
            "weather".parse::<App>(),
            Err(AppError::UnknownApp(name)) if name == "weather"
        ));
    }

    #[test]
    fn every_layout_builds() {
        for app in App::ALL {
            let layout = app.layout().unwrap();
            assert_eq!(layout.name, app.name());
            assert!(!layout.charts.is_empty());
        }
    }
}
