use chrono::{DateTime, NaiveDate, Utc};

use crate::models::calendar::ContributionDay;
use crate::models::stats::{LanguageStat, RepoStats, Streaks};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 760;
const GRAPH_WIDTH: f64 = 720.0;
const GRAPH_HEIGHT: f64 = 140.0;
const GRAPH_PADDING: f64 = 30.0;

const LANGUAGE_BAR_WIDTH: f64 = 720.0;
const LANGUAGE_BAR_Y: f64 = 580.0;
const LANGUAGE_BAR_HEIGHT: f64 = 32.0;

// Static style and defs block; light/dark theming is driven by the
// embedder's prefers-color-scheme media query.
const STYLE_AND_DEFS: &str = r##"  <style>
    @media (prefers-color-scheme: dark) {
      .bg { fill: #0d1117; }
      .text { fill: #e6edf3; }
      .border { stroke: #30363d; }
      .grid-line { stroke: #21262d; }
      .axis-label { fill: #7d8590; }
      .section-bg { fill: #161b22; }
    }
    @media (prefers-color-scheme: light) {
      .bg { fill: #ffffff; }
      .text { fill: #24292f; }
      .border { stroke: #d0d7de; }
      .grid-line { stroke: #e6e9ed; }
      .axis-label { fill: #57606a; }
      .section-bg { fill: #f6f8fa; }
    }
    .stat-number { font-size: 52px; font-weight: bold; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; }
    .stat-label { font-size: 15px; font-weight: 600; letter-spacing: 0.3px; }
    .stat-detail { font-size: 12px; opacity: 0.75; }
    .lang-text { font-size: 15px; font-weight: 500; }
    .lang-percentage { font-size: 16px; font-weight: 600; opacity: 0.8; }
    .section-title { font-size: 18px; font-weight: 700; letter-spacing: -0.3px; }
    .accent-red { fill: #f85149; }
    .accent-blue { fill: #58a6ff; }
    .accent-green { fill: #3fb950; }
    .accent-purple { fill: #a371f7; }
    .graph-line { stroke: #3fb950; stroke-width: 3; fill: none; stroke-linecap: round; stroke-linejoin: round; }
    .graph-area { fill: url(#gradient); opacity: 0.3; }
    .grid-line { stroke-width: 1; opacity: 0.3; }
    .axis-label { font-size: 11px; font-weight: 500; }
    .text { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; }
  </style>

  <defs>
    <linearGradient id="gradient" x1="0%" y1="0%" x2="0%" y2="100%">
      <stop offset="0%" style="stop-color:#3fb950;stop-opacity:0.8" />
      <stop offset="100%" style="stop-color:#3fb950;stop-opacity:0.1" />
    </linearGradient>
    <filter id="shadow">
      <feDropShadow dx="0" dy="1" stdDeviation="3" flood-opacity="0.15"/>
    </filter>
  </defs>
"##;

/// Render the badge. Pure function of its inputs; the output is a
/// complete standalone SVG document.
pub fn render_badge(
    total_contributions: u32,
    streaks: &Streaks,
    activity_days: &[ContributionDay],
    languages: &[LanguageStat],
    created_at: DateTime<Utc>,
    repo_stats: &RepoStats,
) -> String {
    let account_created = format_date(created_at.date_naive());
    let current_start = format_date(streaks.current_start);
    let longest_start = format_date(streaks.longest_start);
    let longest_end = format_date(streaks.longest_end);

    let (line_path, area_path) = activity_paths(activity_days);
    let grid = grid_lines(activity_days);

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        WIDTH, HEIGHT
    );
    svg.push_str(STYLE_AND_DEFS);

    // Background
    svg.push_str(&format!(
        "  <rect width=\"{}\" height=\"{}\" class=\"bg\" rx=\"12\"/>\n",
        WIDTH, HEIGHT
    ));

    // Top stats band: total contributions, current streak, longest streak
    svg.push_str(
        "  <rect x=\"10\" y=\"10\" width=\"780\" height=\"160\" class=\"section-bg\" rx=\"10\"/>\n\
         \x20 <rect x=\"10\" y=\"10\" width=\"780\" height=\"160\" fill=\"none\" class=\"border\" stroke-width=\"2\" rx=\"10\"/>\n",
    );
    svg.push_str(&format!(
        "  <g transform=\"translate(140, 90)\">\n\
         \x20   <circle cx=\"0\" cy=\"0\" r=\"50\" class=\"accent-red\" opacity=\"0.12\"/>\n\
         \x20   <text x=\"0\" y=\"8\" class=\"text stat-number accent-red\" text-anchor=\"middle\">{}</text>\n\
         \x20   <text x=\"0\" y=\"31\" class=\"accent-red stat-label\" text-anchor=\"middle\">Total Contributions</text>\n\
         \x20   <text x=\"0\" y=\"50\" class=\"text stat-detail\" text-anchor=\"middle\">{} - Present</text>\n\
         \x20 </g>\n",
        with_thousands(total_contributions as u64),
        account_created,
    ));
    svg.push_str(&format!(
        "  <g transform=\"translate(400, 90)\">\n\
         \x20   <circle cx=\"0\" cy=\"0\" r=\"50\" class=\"accent-blue\" opacity=\"0.12\"/>\n\
         \x20   <text x=\"0\" y=\"8\" class=\"text stat-number accent-blue\" text-anchor=\"middle\">{}</text>\n\
         \x20   <text x=\"0\" y=\"31\" class=\"accent-blue stat-label\" text-anchor=\"middle\">Current Streak</text>\n\
         \x20   <text x=\"0\" y=\"50\" class=\"text stat-detail\" text-anchor=\"middle\">{} - Present</text>\n\
         \x20 </g>\n",
        streaks.current, current_start,
    ));
    svg.push_str(&format!(
        "  <g transform=\"translate(660, 90)\">\n\
         \x20   <circle cx=\"0\" cy=\"0\" r=\"50\" class=\"accent-purple\" opacity=\"0.12\"/>\n\
         \x20   <text x=\"0\" y=\"8\" class=\"text stat-number accent-purple\" text-anchor=\"middle\">{}</text>\n\
         \x20   <text x=\"0\" y=\"31\" class=\"accent-purple stat-label\" text-anchor=\"middle\">Longest Streak</text>\n\
         \x20   <text x=\"0\" y=\"50\" class=\"text stat-detail\" text-anchor=\"middle\">{} - {}</text>\n\
         \x20 </g>\n",
        streaks.longest, longest_start, longest_end,
    ));
    svg.push_str(
        "  <line x1=\"270\" y1=\"30\" x2=\"270\" y2=\"150\" class=\"border\" stroke-width=\"2\" opacity=\"0.3\"/>\n\
         \x20 <line x1=\"530\" y1=\"30\" x2=\"530\" y2=\"150\" class=\"border\" stroke-width=\"2\" opacity=\"0.3\"/>\n",
    );

    // 90-day activity curve
    svg.push_str(
        "  <rect x=\"10\" y=\"190\" width=\"780\" height=\"190\" class=\"section-bg\" rx=\"10\"/>\n\
         \x20 <rect x=\"10\" y=\"190\" width=\"780\" height=\"190\" fill=\"none\" class=\"border\" stroke-width=\"2\" rx=\"10\"/>\n\
         \x20 <text x=\"30\" y=\"218\" class=\"text section-title\">Contribution Activity (Last 90 Days)</text>\n",
    );
    svg.push_str("  <g transform=\"translate(30, 240)\">\n");
    svg.push_str(&grid);
    if !area_path.is_empty() {
        svg.push_str(&format!(
            "    <path d=\"{}\" class=\"graph-area\"/>\n    <path d=\"{}\" class=\"graph-line\"/>\n",
            area_path, line_path,
        ));
    }
    svg.push_str(&format!(
        "    <line x1=\"{p}\" y1=\"{bottom}\" x2=\"{right}\" y2=\"{bottom}\" class=\"border\" stroke-width=\"2\"/>\n\
         \x20   <line x1=\"{p}\" y1=\"{p}\" x2=\"{p}\" y2=\"{bottom}\" class=\"border\" stroke-width=\"2\"/>\n\
         \x20   <text x=\"{label_x}\" y=\"{label_y}\" class=\"axis-label\">90 days ago</text>\n\
         \x20   <text x=\"{right_label_x}\" y=\"{label_y}\" class=\"axis-label\" text-anchor=\"end\">Today</text>\n\
         \x20 </g>\n",
        p = GRAPH_PADDING,
        bottom = GRAPH_HEIGHT - GRAPH_PADDING,
        right = GRAPH_WIDTH - GRAPH_PADDING,
        label_x = GRAPH_PADDING + 10.0,
        label_y = GRAPH_HEIGHT - 8.0,
        right_label_x = GRAPH_WIDTH - GRAPH_PADDING - 10.0,
    ));

    // Repository stats band
    svg.push_str(
        "  <rect x=\"10\" y=\"400\" width=\"780\" height=\"90\" class=\"section-bg\" rx=\"10\"/>\n\
         \x20 <rect x=\"10\" y=\"400\" width=\"780\" height=\"90\" fill=\"none\" class=\"border\" stroke-width=\"2\" rx=\"10\"/>\n",
    );
    svg.push_str(&format!(
        "  <g transform=\"translate(0, 455)\">\n\
         \x20   <text x=\"200\" y=\"0\" class=\"text stat-number accent-blue\" text-anchor=\"middle\">{}</text>\n\
         \x20   <text x=\"200\" y=\"22\" class=\"accent-blue stat-label\" text-anchor=\"middle\">Total Stars</text>\n\
         \x20   <text x=\"400\" y=\"0\" class=\"text stat-number accent-purple\" text-anchor=\"middle\">{}</text>\n\
         \x20   <text x=\"400\" y=\"22\" class=\"accent-purple stat-label\" text-anchor=\"middle\">Total Forks</text>\n\
         \x20   <text x=\"600\" y=\"0\" class=\"text stat-number accent-green\" text-anchor=\"middle\">{}</text>\n\
         \x20   <text x=\"600\" y=\"22\" class=\"accent-green stat-label\" text-anchor=\"middle\">Languages Used</text>\n\
         \x20 </g>\n\
         \x20 <line x1=\"310\" y1=\"415\" x2=\"310\" y2=\"475\" class=\"border\" stroke-width=\"2\" opacity=\"0.3\"/>\n\
         \x20 <line x1=\"490\" y1=\"415\" x2=\"490\" y2=\"475\" class=\"border\" stroke-width=\"2\" opacity=\"0.3\"/>\n",
        with_thousands(repo_stats.total_stars),
        with_thousands(repo_stats.total_forks),
        languages.len(),
    ));

    // Language breakdown: stacked bar plus a two-column legend
    svg.push_str(
        "  <rect x=\"10\" y=\"510\" width=\"780\" height=\"240\" class=\"section-bg\" rx=\"10\"/>\n\
         \x20 <rect x=\"10\" y=\"510\" width=\"780\" height=\"240\" fill=\"none\" class=\"border\" stroke-width=\"2\" rx=\"10\"/>\n\
         \x20 <text x=\"30\" y=\"538\" class=\"accent-green section-title\">Most Used Languages</text>\n",
    );
    svg.push_str("  <g>\n");
    svg.push_str(&language_bar(languages));
    svg.push_str("  </g>\n  <g>\n");
    svg.push_str(&language_legend(languages));
    svg.push_str("  </g>\n</svg>");

    svg
}

/// `Mar 1, 2024` style display date.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Group digits with commas: 12345 -> "12,345".
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn max_count(activity_days: &[ContributionDay]) -> u32 {
    activity_days
        .iter()
        .map(|d| d.contribution_count)
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Smoothed line and filled area paths for the activity curve, built
/// from quadratic beziers through segment midpoints. Returns empty
/// strings when there are fewer than two days to draw.
fn activity_paths(activity_days: &[ContributionDay]) -> (String, String) {
    if activity_days.len() < 2 {
        return (String::new(), String::new());
    }

    let max = f64::from(max_count(activity_days));
    let inner_width = GRAPH_WIDTH - 2.0 * GRAPH_PADDING;
    let inner_height = GRAPH_HEIGHT - 2.0 * GRAPH_PADDING;
    let count = activity_days.len();

    let points: Vec<(f64, f64)> = activity_days
        .iter()
        .enumerate()
        .map(|(index, day)| {
            let x = GRAPH_PADDING + index as f64 / (count - 1) as f64 * inner_width;
            let y = GRAPH_HEIGHT
                - GRAPH_PADDING
                - f64::from(day.contribution_count) / max * inner_height;
            (x, y)
        })
        .collect();

    let mut line_path = format!("M {:.2},{:.2}", points[0].0, points[0].1);
    for window in points.windows(2) {
        let (prev_x, prev_y) = window[0];
        let (curr_x, curr_y) = window[1];
        let mid_x = (prev_x + curr_x) / 2.0;
        let mid_y = (prev_y + curr_y) / 2.0;
        line_path.push_str(&format!(
            " Q {:.2},{:.2} {:.2},{:.2}",
            prev_x, prev_y, mid_x, mid_y
        ));
    }
    let (last_x, last_y) = points[count - 1];
    line_path.push_str(&format!(
        " Q {:.2},{:.2} {:.2},{:.2}",
        last_x, last_y, last_x, last_y
    ));

    let baseline = GRAPH_HEIGHT - GRAPH_PADDING;
    let area_path = format!(
        "{} L {:.2},{:.2} L {:.2},{:.2} Z",
        line_path,
        GRAPH_WIDTH - GRAPH_PADDING,
        baseline,
        GRAPH_PADDING,
        baseline
    );

    (line_path, area_path)
}

/// Five horizontal gridlines with rounded count labels.
fn grid_lines(activity_days: &[ContributionDay]) -> String {
    let max = max_count(activity_days);
    let inner_height = GRAPH_HEIGHT - 2.0 * GRAPH_PADDING;
    let mut out = String::new();
    for step in 0..=4u32 {
        let y = GRAPH_PADDING + f64::from(step) * inner_height / 4.0;
        let value = (f64::from(max) * (1.0 - f64::from(step) / 4.0)).round() as u32;
        out.push_str(&format!(
            "    <line x1=\"{}\" y1=\"{:.2}\" x2=\"{}\" y2=\"{:.2}\" class=\"grid-line\"/>\n\
             \x20   <text x=\"{}\" y=\"{:.2}\" class=\"axis-label\" text-anchor=\"end\">{}</text>\n",
            GRAPH_PADDING,
            y,
            GRAPH_WIDTH - GRAPH_PADDING,
            y,
            GRAPH_PADDING - 15.0,
            y + 4.0,
            value,
        ));
    }
    out
}

fn language_bar(languages: &[LanguageStat]) -> String {
    let mut out = String::new();
    let mut current_x = 0.0;
    for (index, language) in languages.iter().enumerate() {
        let share: f64 = language.percentage.parse().unwrap_or(0.0);
        let segment_width = share / 100.0 * LANGUAGE_BAR_WIDTH;
        let rounded = index == 0 || index == languages.len() - 1;
        out.push_str(&format!(
            "    <rect x=\"{:.2}\" y=\"{}\" width=\"{:.2}\" height=\"{}\" fill=\"{}\" rx=\"{}\"/>\n",
            current_x + 40.0,
            LANGUAGE_BAR_Y,
            segment_width,
            LANGUAGE_BAR_HEIGHT,
            language.color,
            if rounded { 6 } else { 0 },
        ));
        current_x += segment_width;
    }
    out
}

fn language_legend(languages: &[LanguageStat]) -> String {
    let mut out = String::new();
    for (index, language) in languages.iter().enumerate() {
        let row = index / 2;
        let column = index % 2;
        let x = if column == 0 { 100.0 } else { 450.0 };
        let y = 645.0 + row as f64 * 42.0;
        out.push_str(&format!(
            "    <circle cx=\"{}\" cy=\"{}\" r=\"7\" fill=\"{}\"/>\n\
             \x20   <text x=\"{}\" y=\"{}\" class=\"text lang-text\">{}</text>\n\
             \x20   <text x=\"{}\" y=\"{}\" class=\"text lang-percentage\" text-anchor=\"end\">{}%</text>\n",
            x - 45.0,
            y - 4.0,
            language.color,
            x,
            y,
            language.name,
            x + 230.0,
            y,
            language.percentage,
        ));
    }
    out
}
