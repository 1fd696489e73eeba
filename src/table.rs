use chrono::{DateTime, NaiveDate};
use comfy_table::{CellAlignment, Table};

use crate::traffic::{DailyViewSample, TrafficRecord};

pub const HEADING: &str = "Traffic Data per Repository:";

/// `<timestamp> (<count> views), ...` in sample order.
pub fn view_timestamps(samples: &[DailyViewSample]) -> String {
    samples
        .iter()
        .map(|s| format!("{} ({} views)", s.timestamp, s.count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn traffic_table(records: &[TrafficRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Repository",
        "Total Views",
        "Unique Visitors",
        "View Timestamps",
    ]);

    for record in records {
        table.add_row(vec![
            record.repository.clone(),
            record.total_views.to_string(),
            record.unique_visitors.to_string(),
            view_timestamps(&record.daily_samples),
        ]);
    }

    for idx in [1, 2] {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}

/// Totals across all records plus the first and last sampled day.
pub fn summary_line(records: &[TrafficRecord]) -> String {
    let views = records
        .iter()
        .map(|r| r.total_views)
        .fold(0, u64::saturating_add);
    let uniques = records
        .iter()
        .map(|r| r.unique_visitors)
        .fold(0, u64::saturating_add);

    let mut line = format!(
        "Total: {views} views, {uniques} unique visitors across {} repositor{}",
        records.len(),
        if records.len() == 1 { "y" } else { "ies" }
    );

    if let Some((first, last)) = sample_window(records) {
        line.push_str(&format!(" ({first} to {last})"));
    }

    line
}

fn sample_window(records: &[TrafficRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let days = records
        .iter()
        .flat_map(|r| &r.daily_samples)
        .filter_map(|s| DateTime::parse_from_rfc3339(&s.timestamp).ok())
        .map(|t| t.date_naive());

    days.fold(None, |acc, day| match acc {
        None => Some((day, day)),
        Some((lo, hi)) => Some((lo.min(day), hi.max(day))),
    })
}
