// Detector-comparison report rendering

use super::{fmt_rate, rule, Align, RenderedReport, ReportKind, Table};
use crate::aggregate::{BestDetector, ColumnAverage, ComparisonMatrix};
use crate::catalog::{DetectorCatalog, LOCK_ORDER_COLUMN_SUFFIX};
use crate::error::Result;
use serde::Serialize;

const RULE_WIDTH: usize = 160;

/// Columns called out in the recommendations when present
const RECOMMENDED_COLUMNS: [&str; 2] = ["DX-Agg", "DX"];

#[derive(Serialize)]
struct ComparisonJson<'a> {
    #[serde(flatten)]
    matrix: &'a ComparisonMatrix,
    best_by_scenario: Vec<BestDetector>,
    column_averages: Vec<ColumnAverage>,
    best_overall: Option<ColumnAverage>,
}

fn cell_text(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{}%", fmt_rate(rate)),
        None => "N/A".to_string(),
    }
}

fn rate_table(matrix: &ComparisonMatrix) -> Table {
    let headers = std::iter::once("Scenario".to_string()).chain(matrix.columns.iter().cloned());
    let mut table = Table::new(headers).align(0, Align::Left);

    for summary in &matrix.scenarios {
        let mut row = vec![summary.scenario.clone()];
        row.extend((0..matrix.columns.len()).map(|i| cell_text(summary.rate(i))));
        table.add_row(row);
    }

    table
}

fn legend(matrix: &ComparisonMatrix, catalog: &DetectorCatalog) -> String {
    let mut out = String::from("Column Legend:\n");
    for column in &matrix.columns {
        if let Some(description) = catalog.describe(column) {
            out.push_str(&format!("  {:<14}= {}\n", column, description));
        }
    }
    if matrix
        .columns
        .iter()
        .any(|c| c.ends_with(LOCK_ORDER_COLUMN_SUFFIX))
    {
        out.push_str("  (+LO columns indicate Deloxide tests paired with the lock-order checker)\n");
    }
    out
}

fn console(matrix: &ComparisonMatrix, catalog: &DetectorCatalog, table: &Table) -> String {
    let mut out = String::new();
    let bar = rule(RULE_WIDTH);

    out.push_str(&format!("{}\n", bar));
    out.push_str("DETECTOR COMPARISON - Detection Rates by Test Scenario\n");
    out.push_str(&format!("{}\n", bar));
    out.push('\n');
    out.push_str(&legend(matrix, catalog));
    out.push_str(&format!("{}\n", bar));
    out.push_str(&table.to_text());
    out.push_str(&format!("{}\n", bar));

    out.push('\n');
    out.push_str("📈 Summary:\n");
    out.push_str(&format!("   - {} test scenarios compared\n", matrix.scenarios.len()));
    out.push_str(&format!("   - {} detectors evaluated\n", matrix.columns.len()));
    if let Some(best) = matrix.best_overall() {
        if let Some(avg) = best.average {
            out.push_str(&format!(
                "   - Best performer: {} ({}% avg detection)\n",
                best.column,
                fmt_rate(avg)
            ));
        }
    }

    out
}

fn markdown(matrix: &ComparisonMatrix, catalog: &DetectorCatalog, table: &Table) -> String {
    let mut md = String::new();

    md.push_str("# Detector Comparison\n\n");
    md.push_str(
        "**Note**: Detection rates exclude timeouts. Only runs that completed (either with detection or without) are counted.\n\n",
    );
    md.push_str("## Column Legend\n\n");
    for column in &matrix.columns {
        if let Some(description) = catalog.describe(column) {
            md.push_str(&format!("- **{}**: {}\n", column, description));
        }
    }
    md.push_str("\n## Detection Rates by Test Scenario\n\n");
    md.push_str(&table.to_markdown());

    md.push_str("\n## Analysis\n\n");
    md.push_str("### Best Detector by Scenario\n\n");
    for best in matrix.best_by_scenario() {
        md.push_str(&format!(
            "- **{}**: {} ({}%)\n",
            best.scenario,
            best.column,
            fmt_rate(best.detection_rate)
        ));
    }

    md.push_str("\n### Overall Statistics\n\n");
    for column in matrix.column_averages() {
        if let Some(avg) = column.average {
            md.push_str(&format!(
                "- **{}**: Average detection rate = {}%\n",
                column.column,
                fmt_rate(avg)
            ));
        }
    }

    md.push_str("\n## Recommendations\n\n");
    if let Some(best) = matrix.best_overall() {
        if let Some(avg) = best.average {
            md.push_str(&format!(
                "**Best overall detector**: {} ({}% average)\n\n",
                best.column,
                fmt_rate(avg)
            ));
        }
    }
    for label in RECOMMENDED_COLUMNS {
        let average = matrix
            .column_index(label)
            .and_then(|i| matrix.column_average(i));
        if let (Some(avg), Some(description)) = (average, catalog.describe(label)) {
            md.push_str(&format!(
                "- `{}` shows {}% detection rate\n",
                description,
                fmt_rate(avg)
            ));
        }
    }
    md.push_str("\n💡 For production use, balance detection rate with performance overhead.\n");

    md
}

/// Render the detector-comparison report
pub fn render_comparison(
    matrix: &ComparisonMatrix,
    catalog: &DetectorCatalog,
) -> Result<RenderedReport> {
    let table = rate_table(matrix);
    let json = ComparisonJson {
        matrix,
        best_by_scenario: matrix.best_by_scenario(),
        column_averages: matrix.column_averages(),
        best_overall: matrix.best_overall(),
    };

    Ok(RenderedReport {
        kind: ReportKind::Comparison,
        console: console(matrix, catalog, &table),
        markdown: markdown(matrix, catalog, &table),
        json: serde_json::to_value(&json)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{ComparisonCell, ScenarioSummary};

    fn cell(flagged: usize, completed: usize) -> Option<ComparisonCell> {
        Some(ComparisonCell {
            completed,
            flagged,
            timed_out: 0,
            detection_rate: flagged as f64 / completed as f64 * 100.0,
        })
    }

    fn matrix() -> ComparisonMatrix {
        ComparisonMatrix {
            columns: vec!["DX".to_string(), "DX+LO".to_string(), "DX-Agg".to_string()],
            scenarios: vec![
                ScenarioSummary {
                    scenario: "dining".to_string(),
                    cells: vec![cell(1, 2), None, cell(2, 2)],
                },
                ScenarioSummary {
                    scenario: "two_lock".to_string(),
                    cells: vec![cell(1, 4), cell(4, 4), None],
                },
            ],
        }
    }

    #[test]
    fn test_null_cells_render_na() {
        let table = rate_table(&matrix());
        let md = table.to_markdown();
        assert!(md.contains("| dining | 50.0% | N/A | 100.0% |"));
        assert!(md.contains("| two_lock | 25.0% | 100.0% | N/A |"));
    }

    #[test]
    fn test_legend_uses_catalog_descriptions() {
        let catalog = DetectorCatalog::default();
        let rendered = render_comparison(&matrix(), &catalog).unwrap();
        assert!(rendered
            .console
            .contains("  DX            = Deloxide (vanilla)\n"));
        assert!(rendered
            .console
            .contains("  DX+LO         = Deloxide (vanilla) + Lock Order\n"));
        assert!(rendered.console.contains("(+LO columns indicate"));
    }

    #[test]
    fn test_markdown_analysis_sections() {
        let catalog = DetectorCatalog::default();
        let md = render_comparison(&matrix(), &catalog).unwrap().markdown;
        assert!(md.contains("- **dining**: DX-Agg (100.0%)"));
        assert!(md.contains("- **two_lock**: DX+LO (100.0%)"));
        assert!(md.contains("- **DX**: Average detection rate = 37.5%"));
        assert!(md.contains("**Best overall detector**: DX+LO (100.0% average)"));
        assert!(md.contains("- `Deloxide + Aggressive Stress` shows 100.0% detection rate"));
        assert!(md.contains("- `Deloxide (vanilla)` shows 37.5% detection rate"));
    }

    #[test]
    fn test_console_summary() {
        let catalog = DetectorCatalog::default();
        let console = render_comparison(&matrix(), &catalog).unwrap().console;
        assert!(console.contains("   - 2 test scenarios compared"));
        assert!(console.contains("   - 3 detectors evaluated"));
        assert!(console.contains("   - Best performer: DX+LO (100.0% avg detection)"));
    }

    #[test]
    fn test_json_includes_derived_views() {
        let catalog = DetectorCatalog::default();
        let json = render_comparison(&matrix(), &catalog).unwrap().json;
        assert_eq!(json["columns"][1], "DX+LO");
        assert!(json["scenarios"][0]["cells"][1].is_null());
        assert_eq!(json["best_overall"]["column"], "DX+LO");
        assert_eq!(json["best_by_scenario"].as_array().map(Vec::len), Some(2));
    }
}
