use chrono::NaiveDate;

use crate::traffic::TrafficRecord;

const PLOT_HEIGHT: f32 = 400.0;
const TOP_PADDING: f32 = 70.0;
const LEFT_PADDING: f32 = 80.0;
const RIGHT_PADDING: f32 = 30.0;
const BAR_SLOT: f32 = 48.0;
const BAR_FILL_RATIO: f32 = 0.7;
const LABEL_CHAR_WIDTH: f32 = 7.2;
const LABEL_GAP: f32 = 8.0;
const AXIS_TITLE_SPACE: f32 = 60.0;
const MIN_PLOT_WIDTH: f32 = 400.0;
const TARGET_TICKS: u64 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub grid: &'static str,
    pub bar: &'static str,
    pub cc: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                text: "#c9d1d9",
                grid: "#30363d",
                bar: "#a5d6ff",
                cc: "#616e7f",
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#24292f",
                grid: "#d0d7de",
                bar: "#87ceeb",
                cc: "#6a737d",
            },
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Smallest 1/2/5 x 10^n step that covers `max` in about [`TARGET_TICKS`] ticks.
fn tick_step(max: u64) -> u64 {
    let raw = max.div_ceil(TARGET_TICKS).max(1);
    let mut magnitude = 1u64;
    while magnitude.saturating_mul(10) <= raw {
        magnitude *= 10;
    }

    [1u64, 2, 5, 10]
        .into_iter()
        .map(|m| m.saturating_mul(magnitude))
        .find(|step| *step >= raw)
        .unwrap_or(magnitude.saturating_mul(10))
}

/// Top of the y axis: `max` rounded up to a whole step, never zero.
fn axis_max(max: u64, step: u64) -> u64 {
    max.div_ceil(step).max(1).saturating_mul(step)
}

/// Bar chart of total views per repository, one bar per record in input order.
pub fn generate_chart(
    records: &[TrafficRecord],
    account: &str,
    theme: Theme,
    generated: NaiveDate,
) -> String {
    let colors = theme.colors();

    let max_views = records.iter().map(|r| r.total_views).max().unwrap_or(0);
    let step = tick_step(max_views);
    let top = axis_max(max_views, step);

    let longest_label = records
        .iter()
        .map(|r| r.repository.chars().count())
        .max()
        .unwrap_or(0);
    let label_height = longest_label as f32 * LABEL_CHAR_WIDTH + LABEL_GAP;

    let plot_width = (records.len() as f32 * BAR_SLOT).max(MIN_PLOT_WIDTH);
    let slot = plot_width / records.len().max(1) as f32;
    let bar_width = slot * BAR_FILL_RATIO;

    let axis_y = TOP_PADDING + PLOT_HEIGHT;
    let axis_right = LEFT_PADDING + plot_width;
    let w = axis_right + RIGHT_PADDING;
    let h = axis_y + label_height + AXIS_TITLE_SPACE;

    // Gridlines and y tick labels
    let mut grid = String::new();
    let mut next = Some(0u64);
    while let Some(tick) = next.filter(|t| *t <= top) {
        let y = axis_y - (tick as f32 / top as f32) * PLOT_HEIGHT;
        grid.push_str(&format!(
            r#"<line x1="{LEFT_PADDING}" y1="{y}" x2="{axis_right}" y2="{y}" class="grid"/>
<text x="{}" y="{}" text-anchor="end" class="tick">{tick}</text>
"#,
            LEFT_PADDING - 6.0,
            y + 4.0
        ));
        next = tick.checked_add(step);
    }

    // Bars, values and rotated repository labels
    let mut bars = String::new();
    for (i, record) in records.iter().enumerate() {
        let x = LEFT_PADDING + i as f32 * slot + (slot - bar_width) / 2.0;
        let cx = x + bar_width / 2.0;
        let bh = (record.total_views as f32 / top as f32) * PLOT_HEIGHT;
        let y = axis_y - bh;
        let name = escape_xml(&record.repository);
        let label_y = axis_y + LABEL_GAP;

        bars.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{bar_width}" height="{bh}" class="bar"><title>{name}: {views}</title></rect>
<text x="{cx}" y="{}" text-anchor="middle" class="value">{views}</text>
<text x="{cx}" y="{label_y}" text-anchor="end" transform="rotate(-90 {cx} {label_y})" class="label">{name}</text>
"#,
            y - 4.0,
            views = record.total_views,
        ));
    }

    let title = escape_xml(&format!(
        "GitHub Traffic Views per Repository for {account}"
    ));

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="Segoe UI,Helvetica,Arial,sans-serif"
     font-size="12px">

<style>
.grid  {{ stroke: {grid}; stroke-width: 1; }}
.axis  {{ stroke: {text}; stroke-width: 1; }}
.bar   {{ fill: {bar}; }}
.tick  {{ fill: {cc}; }}
.value {{ fill: {text}; font-size: 11px; }}
.label {{ fill: {text}; }}
.title {{ fill: {text}; font-size: 18px; font-weight: bold; }}
.note  {{ fill: {cc}; font-size: 10px; }}
</style>

<rect width="{w}px" height="{h}px" fill="{bg}"/>

<text x="{mid}" y="35" text-anchor="middle" class="title">{title}</text>

<!-- GRID -->
{grid_lines}
<line x1="{LEFT_PADDING}" y1="{TOP_PADDING}" x2="{LEFT_PADDING}" y2="{axis_y}" class="axis"/>
<line x1="{LEFT_PADDING}" y1="{axis_y}" x2="{axis_right}" y2="{axis_y}" class="axis"/>

<!-- BARS -->
{bars}
<text x="20" y="{mid_y}" text-anchor="middle" transform="rotate(-90 20 {mid_y})" class="label">Total Views</text>
<text x="{mid_plot}" y="{x_title_y}" text-anchor="middle" class="label">Repository</text>
<text x="{note_x}" y="{note_y}" text-anchor="end" class="note">Generated {generated}</text>

</svg>
"#,
        w = w,
        h = h,
        bg = colors.bg,
        text = colors.text,
        grid = colors.grid,
        bar = colors.bar,
        cc = colors.cc,
        mid = w / 2.0,
        mid_y = TOP_PADDING + PLOT_HEIGHT / 2.0,
        mid_plot = LEFT_PADDING + plot_width / 2.0,
        x_title_y = axis_y + label_height + 25.0,
        note_x = w - 10.0,
        note_y = h - 10.0,
        grid_lines = grid,
        bars = bars,
        title = title,
        generated = generated,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(repo: &str, views: u64) -> TrafficRecord {
        TrafficRecord {
            repository: repo.into(),
            total_views: views,
            unique_visitors: 0,
            daily_samples: Vec::new(),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 14).unwrap()
    }

    #[test]
    fn tick_steps_are_round() {
        assert_eq!(tick_step(0), 1);
        assert_eq!(tick_step(4), 1);
        assert_eq!(tick_step(10), 2);
        assert_eq!(tick_step(37), 10);
        assert_eq!(tick_step(480), 100);
        assert_eq!(tick_step(1200), 500);
    }

    #[test]
    fn axis_covers_maximum() {
        assert_eq!(axis_max(0, 1), 1);
        assert_eq!(axis_max(37, 10), 40);
        assert_eq!(axis_max(40, 10), 40);
        assert_eq!(axis_max(u64::MAX, tick_step(u64::MAX)), u64::MAX);
    }

    #[test]
    fn one_bar_per_record_in_order() {
        let records = vec![record("acct/b", 3), record("acct/a", 10)];
        let svg = generate_chart(&records, "acct", Theme::Light, day());

        assert_eq!(svg.matches(r#"class="bar""#).count(), 2);
        assert!(svg.find("acct/b").unwrap() < svg.find("acct/a").unwrap());
        assert!(svg.contains("GitHub Traffic Views per Repository for acct"));
        assert!(svg.contains("Generated 2024-10-14"));
    }

    #[test]
    fn tallest_bar_spans_the_plot() {
        let svg = generate_chart(&[record("acct/a", 10)], "acct", Theme::Dark, day());
        assert!(svg.contains(&format!(r#"height="{PLOT_HEIGHT}" class="bar""#)));
        assert!(svg.contains("#161b22"));
    }

    #[test]
    fn huge_counts_still_render() {
        let svg = generate_chart(&[record("acct/a", u64::MAX)], "acct", Theme::Light, day());
        assert_eq!(svg.matches(r#"class="bar""#).count(), 1);
    }

    #[test]
    fn names_are_escaped() {
        let svg = generate_chart(&[record("a&b/<x>", 1)], "a&b", Theme::Light, day());
        assert!(svg.contains("a&amp;b/&lt;x&gt;"));
        assert!(!svg.contains("a&b/"));
    }
}
