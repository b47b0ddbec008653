//src/tracker.rs

use std::fmt::Write as FmtWrite;
use crate::types::FileSummaryRow;

/// Column headers, in `FileSummaryRow` field order.
pub const SUMMARY_HEADERS: [&str; 6] = [
    "File",
    "Total Reads",
    "Reads with Cutting Sites",
    "Reads with One Cutting Site",
    "Reads with One or Two Cutting Sites",
    "Reads with Three or More Cutting Sites",
];

/// Append-only log of summary rows, one per successfully processed file.
#[derive(Debug, Default, Clone)]
pub struct RunTracker {
    rows: Vec<FileSummaryRow>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: FileSummaryRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[FileSummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Grid table of every row so far. The file column is left aligned,
    /// counts are right aligned.
    pub fn render(&self) -> String {
        let cells: Vec<[String; 6]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.path.display().to_string(),
                    row.total_reads.to_string(),
                    row.with_sites.to_string(),
                    row.one.to_string(),
                    row.one_or_two.to_string(),
                    row.three_plus.to_string(),
                ]
            })
            .collect();

        let mut widths = SUMMARY_HEADERS.map(str::len);
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let rule = |fill: char| {
            let mut line = String::from("+");
            for w in &widths {
                line.extend(std::iter::repeat(fill).take(w + 2));
                line.push('+');
            }
            line
        };

        let mut output = String::new();
        let _ = writeln!(output, "{}", rule('-'));
        output.push('|');
        for (header, w) in SUMMARY_HEADERS.iter().zip(&widths) {
            let _ = write!(output, " {:<w$} |", header, w = *w);
        }
        output.push('\n');
        let _ = writeln!(output, "{}", rule('='));

        for row in &cells {
            output.push('|');
            for (i, (cell, w)) in row.iter().zip(&widths).enumerate() {
                if i == 0 {
                    let _ = write!(output, " {:<w$} |", cell, w = *w);
                } else {
                    let _ = write!(output, " {:>w$} |", cell, w = *w);
                }
            }
            output.push('\n');
            let _ = writeln!(output, "{}", rule('-'));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn row(path: &str, total: usize, with_sites: usize) -> FileSummaryRow {
        FileSummaryRow {
            path: PathBuf::from(path),
            total_reads: total,
            with_sites,
            one: with_sites / 2,
            one_or_two: with_sites,
            three_plus: 0,
        }
    }

    #[test]
    fn test_rows_keep_insertion_order() {
        let mut tracker = RunTracker::new();
        tracker.record(row("b.fastq", 10, 4));
        tracker.record(row("a.fastq", 20, 8));
        let paths: Vec<_> = tracker.rows().iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, [PathBuf::from("b.fastq"), PathBuf::from("a.fastq")]);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_render_empty_has_header_only() {
        let text = RunTracker::new().render();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("| File |"));
    }

    #[test]
    fn test_render_grid() {
        let mut tracker = RunTracker::new();
        tracker.record(FileSummaryRow {
            path: PathBuf::from("run/batch_0.fastq"),
            total_reads: 100,
            with_sites: 40,
            one: 25,
            one_or_two: 35,
            three_plus: 5,
        });
        let text = tracker.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with(&format!("+{}+", "-".repeat(19))));
        assert!(lines[2].starts_with(&format!("+{}+", "=".repeat(19))));
        assert!(lines[3].starts_with(&format!("| run/batch_0.fastq | {}100 |", " ".repeat(8))));
        assert!(lines[3].ends_with(&format!("|{}5 |", " ".repeat(38))));
        // every line spans the same width
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }
}
