//! Plain-text rendering of a dashboard state.

use cenipa_map_dashboard::{SidebarState, render};
use cenipa_map_occurrence_models::{Occurrence, OccurrenceTable};

const ROW_HEADER: [&str; 6] = ["ID", "DATE", "CLASSIFICATION", "CITY", "AD", "TYPE"];

/// Formats the readout, headline, per-classification counts, and (when
/// the table toggle is on) the matching rows.
#[must_use]
pub fn format_report(table: &OccurrenceTable, state: &SidebarState, attribution: &str) -> String {
    let view = render(table, state, attribution);

    let mut lines = vec![
        view.title,
        view.headline.replace("**", ""),
        view.sidebar.info,
    ];

    lines.extend(view.sidebar.counts.iter().map(|entry| {
        format!("  {:<18} {}", entry.classification.as_ref(), entry.count)
    }));

    lines.push(format!(
        "{} occurrences on the map.",
        view.point_map.points.len()
    ));

    if let Some(rows) = &view.table {
        lines.push(String::new());
        lines.push(format_columns(&ROW_HEADER.map(str::to_owned)));
        lines.extend(rows.rows.iter().map(format_row));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn format_row(row: &Occurrence) -> String {
    let date = row
        .date
        .map_or_else(|| "-".to_owned(), |d| d.format("%Y-%m-%d %H:%M").to_string());
    format_columns(&[
        row.id.clone(),
        date,
        row.classification.clone(),
        row.city.clone(),
        row.aerodrome.clone(),
        row.kind.clone(),
    ])
}

fn format_columns(cols: &[String; 6]) -> String {
    format!(
        "{:<8} {:<16} {:<18} {:<24} {:<6} {}",
        cols[0], cols[1], cols[2], cols[3], cols[4], cols[5]
    )
}
