use std::io::{self, Write};

use anyhow::{Context, Result};
use dash_apps::App;
use dash_core::{Frame, Session};
use dash_model::Schema;
use tracing::{info, info_span};

use dash_cli::render::{frame_json, frame_text};
use dash_cli::script::read_events;

use crate::cli::{ControlsArgs, OutputArg, RunArgs};

/// Counts reported after a replay.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub frames: usize,
    pub rejected: usize,
}

pub fn run_dashboard(args: &RunArgs) -> Result<RunSummary> {
    let app = App::from(args.app);
    let span = info_span!("run", app = app.name());
    let _guard = span.enter();

    let mut layout = app.layout().context("build dashboard layout")?;
    if let Some(size) = args.page_size {
        layout = layout.with_page_size(size as usize);
    }
    let events = match &args.events {
        Some(path) => read_events(path)?,
        None => Vec::new(),
    };
    let session = app
        .open_with(&args.csv, layout)
        .with_context(|| format!("load {}", args.csv.display()))?;

    let mut stdout = io::stdout().lock();
    let mut summary = RunSummary::default();
    let initial = session.render()?;
    emit(&mut stdout, &session, &initial, args.output)?;
    summary.frames += 1;

    for event in &events {
        let frame = session.dispatch(event)?;
        if frame.rejected.is_some() {
            summary.rejected += 1;
        }
        emit(&mut stdout, &session, &frame, args.output)?;
        summary.frames += 1;
    }
    info!(
        events = events.len(),
        rejected = summary.rejected,
        "event script replayed"
    );
    Ok(summary)
}

pub fn run_controls(args: &ControlsArgs) -> Result<()> {
    let app = App::from(args.app);
    let schema = match &args.csv {
        Some(path) => dash_ingest::load(path, &app.load_options()?)
            .with_context(|| format!("load {}", path.display()))?
            .schema()
            .clone(),
        None => Schema::default(),
    };
    let controls = app.controls(&schema)?;
    println!("{}", serde_json::to_string_pretty(&controls)?);
    Ok(())
}

fn emit(out: &mut impl Write, session: &Session, frame: &Frame, output: OutputArg) -> Result<()> {
    match output {
        OutputArg::Json => writeln!(out, "{}", frame_json(frame)?)?,
        OutputArg::Table => {
            let table = session.table()?;
            writeln!(out, "{}", frame_text(frame, &table, session.layout()))?;
        }
    }
    Ok(())
}
