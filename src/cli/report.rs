use chrono::DateTime;
use chrono::Duration;
use chrono::Local;
use chrono::Utc;

use crate::storage::Config;
use crate::tracker::Project;
use crate::tracker::TimeSpan;

const TIMECARD_SEPARATOR: &str = "-----------------------------------------------------";

/// Lines describing which projects are running right now and for how long.
pub fn status_lines(root: &Project, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::new();
    status(root, "", now, &mut lines);
    lines
}

fn status(node: &Project, prefix: &str, now: DateTime<Utc>, lines: &mut Vec<String>) {
    for child in &node.children {
        let path = join_path(prefix, &child.name);
        if child.is_running {
            if let Some(entry) = child.entries.last().filter(|e| e.is_open()) {
                lines.push(format!(
                    "{path} is running ({})",
                    format_duration(now - entry.start)
                ));
            }
        }
        status(child, &path, now, lines);
    }
}

/// Aligned per-project totals over the span. The root row carries the grand
/// total; archived rows are dropped while their children are still visited.
pub fn stats_lines(root: &Project, span: &TimeSpan, now: DateTime<Utc>) -> Vec<String> {
    let since = now - span.duration;
    let mut rows = Vec::new();
    stats(root, 0, since, now, &mut rows);
    align_columns(&rows)
}

fn stats(
    node: &Project,
    depth: usize,
    since: DateTime<Utc>,
    now: DateTime<Utc>,
    rows: &mut Vec<Vec<String>>,
) {
    if !node.is_archived {
        let label = if depth == 0 {
            "Total".to_string()
        } else {
            format!("{}↳ {}", "  ".repeat(depth), node.name)
        };
        rows.push(vec![
            label,
            format_duration(node.duration_since(since, now)),
        ]);
    }

    for child in &node.children {
        stats(child, depth + 1, since, now, rows);
    }
}

/// The timecard view: one row per entry for the chosen project and each of
/// its non-archived descendants, then a summed total over the span.
pub fn timecard_lines(
    project: &Project,
    path: &str,
    span: &TimeSpan,
    config: &Config,
    now: DateTime<Utc>,
) -> Vec<String> {
    let since = now - span.duration;

    let mut rows = vec![vec![
        "Project".to_string(),
        "Date".to_string(),
        "Start".to_string(),
        "End".to_string(),
        "Duration".to_string(),
    ]];
    timecard(project, path, since, config, &mut rows);

    let mut lines = align_columns(&rows);
    lines.push(TIMECARD_SEPARATOR.to_string());
    lines.push(format!(
        "Total duration: {} in the past {}",
        format_duration(project.duration_since(since, now)),
        span.label
    ));
    lines
}

fn timecard(
    node: &Project,
    path: &str,
    since: DateTime<Utc>,
    config: &Config,
    rows: &mut Vec<Vec<String>>,
) {
    for entry in node.entries_since(since) {
        let start = entry.start.with_timezone(&Local);
        let end = entry
            .end
            .map(|end| end.with_timezone(&Local).format(&config.time_format).to_string())
            .unwrap_or_default();
        let duration = if entry.is_open() {
            "Running".to_string()
        } else {
            format_duration(entry.duration)
        };

        rows.push(vec![
            path.to_string(),
            start.format(&config.date_format).to_string(),
            start.format(&config.time_format).to_string(),
            end,
            duration,
        ]);
    }

    for child in &node.children {
        if !child.is_archived {
            timecard(child, &join_path(path, &child.name), since, config, rows);
        }
    }
}

pub fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!(
            "{}h{}m{}s",
            v.num_hours(),
            v.num_minutes() % 60,
            v.num_seconds() % 60
        )
    } else if v.num_minutes() > 0 {
        format!("{}m{}s", v.num_minutes() % 60, v.num_seconds() % 60)
    } else {
        format!("{}s", v.num_seconds() % 60)
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Pads every column to the width of its longest cell plus a three-space
/// gap, the last column left ragged.
fn align_columns(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (index, cell) in row.iter().enumerate() {
                if index + 1 == row.len() {
                    line.push_str(cell);
                } else {
                    line.push_str(cell);
                    for _ in cell.chars().count()..widths[index] + 3 {
                        line.push(' ');
                    }
                }
            }
            line
        })
        .collect()
}
