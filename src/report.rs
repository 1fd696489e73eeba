//! Console table and bar chart output.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::RenderError;
use crate::svg::{self, Theme};
use crate::table;
use crate::traffic::TrafficRecord;

pub const DEFAULT_CHART_PATH: &str = "bar_chart.svg";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Overwritten on every run.
    pub chart_path: PathBuf,
    pub theme: Theme,
    /// Launch the system viewer on the written chart.
    pub open: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            theme: Theme::default(),
            open: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { chart: PathBuf },
    /// No records; nothing was drawn or written.
    NothingToDisplay,
}

/// Print the table to `out` and write the chart.
pub fn render(
    records: &[TrafficRecord],
    account: &str,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<RenderOutcome, RenderError> {
    if records.is_empty() {
        writeln!(out, "No traffic data to display for {account}.").map_err(RenderError::Output)?;
        info!(account, "no traffic records, chart skipped");
        return Ok(RenderOutcome::NothingToDisplay);
    }

    writeln!(out, "{}", table::HEADING)
        .and_then(|_| writeln!(out, "{}", table::traffic_table(records)))
        .and_then(|_| writeln!(out, "{}", table::summary_line(records)))
        .map_err(RenderError::Output)?;

    let chart = svg::generate_chart(records, account, options.theme, Utc::now().date_naive());
    fs::write(&options.chart_path, chart).map_err(|source| RenderError::Io {
        path: options.chart_path.clone(),
        source,
    })?;
    info!(path = %options.chart_path.display(), bars = records.len(), "wrote chart");

    if options.open {
        open_in_viewer(&options.chart_path);
    }

    Ok(RenderOutcome::Rendered {
        chart: options.chart_path.clone(),
    })
}

/// Best effort; the chart is already on disk if this fails.
fn open_in_viewer(path: &Path) {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    // The viewer outlives us; the child handle is dropped without waiting.
    match cmd.arg(path).spawn() {
        Ok(child) => drop(child),
        Err(e) => warn!(path = %path.display(), error = %e, "could not open chart viewer"),
    }
}
