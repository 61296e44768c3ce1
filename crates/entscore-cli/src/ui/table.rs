//! Table rendering for CLI output using comfy-table.
//!
//! | Command | Table Function |
//! |---------|----------------|
//! | `entscore rank` | `render_ranking_table()` |
//! | `entscore stats` | `render_metrics_table()` |

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};

use entscore_core::RankedDocument;

use super::format::truncate_str;

/// Render ranked documents for `entscore rank`.
///
/// # Example Output
///
/// ```text
/// RANK   DOCUMENT        SCORE
///    1   pmc-0042       3.1187
///    2   pmc-0007       2.0410
/// ```
pub fn render_ranking_table(results: &[RankedDocument]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("RANK").set_alignment(CellAlignment::Right),
        Cell::new("DOCUMENT"),
        Cell::new("SCORE").set_alignment(CellAlignment::Right),
    ]);

    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(4)),  // RANK
        ColumnConstraint::LowerBoundary(Width::Fixed(12)), // DOCUMENT
        ColumnConstraint::LowerBoundary(Width::Fixed(10)), // SCORE
    ]);

    for result in results {
        table.add_row(vec![
            Cell::new(result.rank).set_alignment(CellAlignment::Right),
            Cell::new(truncate_str(&result.doc_id, 40)),
            Cell::new(format!("{:.4}", result.score)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render a simple key-value metrics table.
///
/// # Example Output
///
/// ```text
/// METRIC              VALUE
/// Documents          12,480
/// Average length     212.41
/// ```
pub fn render_metrics_table(metrics: &[(&str, String)]) -> String {
    if metrics.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("METRIC"),
        Cell::new("VALUE").set_alignment(CellAlignment::Right),
    ]);

    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(18)), // METRIC
        ColumnConstraint::LowerBoundary(Width::Fixed(12)), // VALUE
    ]);

    for (key, value) in metrics {
        table.add_row(vec![
            Cell::new(*key),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_table() {
        let results = vec![
            RankedDocument {
                rank: 1,
                doc_id: "pmc-0042".to_string(),
                score: 3.11874,
            },
            RankedDocument {
                rank: 2,
                doc_id: "pmc-0007".to_string(),
                score: 2.041,
            },
        ];

        let output = render_ranking_table(&results);
        assert!(output.contains("RANK"));
        assert!(output.contains("DOCUMENT"));
        assert!(output.contains("pmc-0042"));
        assert!(output.contains("3.1187"));
        assert!(output.contains("2.0410"));
    }

    #[test]
    fn test_metrics_table() {
        let output = render_metrics_table(&[("Documents", "1,000".to_string())]);
        assert!(output.contains("METRIC"));
        assert!(output.contains("Documents"));
        assert!(output.contains("1,000"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(render_ranking_table(&[]), "");
        assert_eq!(render_metrics_table(&[]), "");
    }
}
