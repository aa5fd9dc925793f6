//! Plain-text job tables.

use trackjobs_core::{Column, ColumnKind, Record};

pub const NO_JOBS: &str = "No jobs found.";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Text cells longer than this many characters are cut and end in `…`.
    pub max_width: usize,
    pub show_directory: bool,
}

/// Render `records` as an aligned table, one row per record.
pub fn render_table(records: &[&Record], options: &RenderOptions) -> String {
    if records.is_empty() {
        return NO_JOBS.to_string();
    }

    let columns: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|c| options.show_directory || *c != Column::Directory)
        .collect();

    let header: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| match c.kind() {
                    ColumnKind::Text | ColumnKind::Status => {
                        truncate(&c.display(r), options.max_width)
                    }
                    _ => c.display(r),
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 2));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(text: &str, max: usize) -> String {
    let max = max.max(1);
    // Newlines would break row alignment.
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use trackjobs_core::JobStatus;

    use super::*;

    fn record(id: i64, name: &str, comment: Option<&str>) -> Record {
        Record {
            id,
            name: name.to_string(),
            script: Some("run.sh".to_string()),
            directory: Some("/scratch/alice/case".to_string()),
            comment: comment.map(String::from),
            status: JobStatus::Running,
            checked: false,
            date_added: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
        }
    }

    const NARROW: RenderOptions = RenderOptions {
        max_width: 80,
        show_directory: false,
    };

    #[test]
    fn empty_selection_prints_message() {
        assert_eq!(render_table(&[], &NARROW), NO_JOBS);
    }

    #[test]
    fn directory_is_hidden_unless_requested() {
        let r = record(1, "relax", None);
        let narrow = render_table(&[&r], &NARROW);
        assert!(!narrow.contains("directory"));
        assert!(!narrow.contains("/scratch/alice/case"));

        let wide = render_table(
            &[&r],
            &RenderOptions {
                max_width: 80,
                show_directory: true,
            },
        );
        assert!(wide.contains("directory"));
        assert!(wide.contains("/scratch/alice/case"));
    }

    #[test]
    fn rows_are_aligned() {
        let a = record(7, "a", None);
        let b = record(1234567, "much-longer-name", Some("note"));
        let out = render_table(&[&a, &b], &NARROW);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id       name"));
        let status_col = lines[0].find("status").unwrap();
        assert_eq!(&lines[2][status_col..status_col + 7], "RUNNING");
        assert_eq!(&lines[3][status_col..status_col + 7], "RUNNING");
        assert!(lines[2].contains("2025-03-14 09:26"));
    }

    #[test]
    fn long_cells_are_truncated() {
        let r = record(1, "x", Some("abcdefghijklmnopqrstuvwxyz"));
        let out = render_table(
            &[&r],
            &RenderOptions {
                max_width: 10,
                show_directory: false,
            },
        );
        assert!(out.contains("abcdefghi…"));
        assert!(!out.contains("abcdefghij"));
        assert!(out.contains("2025-03-14 09:26"));
    }

    #[test]
    fn multiline_comment_stays_on_one_row() {
        let r = record(1, "x", Some("first\nsecond"));
        let out = render_table(&[&r], &NARROW);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("first second"));
    }
}
