//! CLI argument definitions for the dashboard runner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dash_apps::App;

#[derive(Parser)]
#[command(
    name = "dashboard",
    version,
    about = "Run interactive data dashboards headlessly",
    long_about = "Load a dashboard's CSV data, replay UI events against it and print\n\
                  every derived frame (table view, chart specifications, caption).\n\
                  Bundled dashboards: internet, election, bees."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a CSV file and replay an event script against a dashboard.
    Run(RunArgs),

    /// Print a dashboard's control definitions as JSON.
    Controls(ControlsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    #[arg(value_enum, value_name = "APP")]
    pub app: AppArg,

    /// CSV file holding the dashboard's base table.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// JSON Lines file with one UI event per line.
    ///
    /// A line is either a click (`{"click": "CA"}`) or an interaction event
    /// (`{"event": "set_page", "index": 1}`). Blank lines are skipped.
    #[arg(long = "events", value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// Override the table's page size.
    #[arg(long = "page-size", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// How frames are printed.
    #[arg(long = "output", value_enum, default_value = "json")]
    pub output: OutputArg,
}

#[derive(Parser)]
pub struct ControlsArgs {
    #[arg(value_enum, value_name = "APP")]
    pub app: AppArg,

    /// CSV file used to describe the table columns. Without it the table
    /// definition lists no columns.
    #[arg(long = "csv", value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AppArg {
    Internet,
    Election,
    Bees,
}

impl From<AppArg> for App {
    fn from(arg: AppArg) -> Self {
        match arg {
            AppArg::Internet => App::Internet,
            AppArg::Election => App::Election,
            AppArg::Bees => App::Bees,
        }
    }
}

/// Frame output choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// One JSON object per frame, one per line.
    Json,
    /// A table of the visible page plus a chart summary.
    Table,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
