// Detection-rate report rendering

use super::{fmt_ms, fmt_rate, rule, Align, RenderedReport, ReportKind, Table};
use crate::aggregate::DetectionReport;
use crate::discovery::Collection;
use crate::error::Result;

const RULE_WIDTH: usize = 120;

fn summary_table(report: &DetectionReport) -> Table {
    let mut table = Table::new([
        "Type",
        "Test",
        "Scenario",
        "Detector",
        "Total Runs",
        "Detected",
        "Detection Rate (%)",
        "Timed Out",
        "Timeout Rate (%)",
        "Avg Runtime (ms)",
    ])
    .align(1, Align::Left)
    .align(2, Align::Left)
    .align(3, Align::Left);

    for s in &report.summaries {
        table.add_row(vec![
            s.collection.marker().to_string(),
            s.test.clone(),
            s.scenario.clone(),
            s.detector.clone(),
            s.total_runs.to_string(),
            s.detected.to_string(),
            fmt_rate(s.detection_rate),
            s.timed_out.to_string(),
            fmt_rate(s.timeout_rate),
            fmt_ms(s.avg_runtime_ms),
        ]);
    }

    table
}

fn console(report: &DetectionReport, table: &Table) -> String {
    let mut out = String::new();
    let bar = rule(RULE_WIDTH);

    out.push_str(&format!("{}\n", bar));
    out.push_str("DETECTION RATE ANALYSIS\n");
    out.push_str(&format!("{}\n", bar));
    out.push_str(&table.to_text());
    out.push_str(&format!("{}\n", bar));

    out.push('\n');
    out.push_str(&format!(
        "📊 {} test configurations (probabilistic: {}, guaranteed: {})\n",
        report.summaries.len(),
        report.count(Collection::Probabilistic),
        report.count(Collection::Guaranteed)
    ));
    if !report.empty_files.is_empty() {
        out.push_str(&format!(
            "⚠️  {} empty result file(s) skipped\n",
            report.empty_files.len()
        ));
    }

    out
}

fn markdown(report: &DetectionReport, table: &Table) -> String {
    let mut md = String::new();

    md.push_str("# Detection Rate Analysis\n\n");
    md.push_str(
        "**Type Legend**: `P` = Probabilistic (heisenbug), `G` = Guaranteed (barrier-synchronized)\n\n",
    );
    md.push_str("## Summary\n\n");
    md.push_str(&table.to_markdown());
    md.push_str("\n## Key Findings\n\n");

    let probabilistic = report.count(Collection::Probabilistic);
    let guaranteed = report.count(Collection::Guaranteed);

    md.push_str("### Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Total test configurations**: {}\n",
        report.summaries.len()
    ));
    md.push_str(&format!("  - Probabilistic (heisenbug) tests: {}\n", probabilistic));
    md.push_str(&format!("  - Guaranteed deadlock tests: {}\n", guaranteed));
    md.push('\n');

    let averages = [
        ("Probabilistic", Collection::Probabilistic),
        ("Guaranteed", Collection::Guaranteed),
    ];
    let mut wrote_average = false;
    for (name, collection) in averages {
        if let Some(avg) = report.average_detection_rate(collection) {
            md.push_str(&format!("- **{} tests average**: {}%\n", name, fmt_rate(avg)));
            wrote_average = true;
        }
    }
    if wrote_average {
        md.push('\n');
    }

    if let (Some(best), Some(worst)) = (report.best(), report.worst()) {
        md.push_str("### Performance Range\n\n");
        md.push_str(&format!(
            "- **Best performer**: {} ({}) - {}%\n",
            best.test,
            best.collection.marker(),
            fmt_rate(best.detection_rate)
        ));
        md.push_str(&format!(
            "- **Worst performer**: {} ({}) - {}%\n",
            worst.test,
            worst.collection.marker(),
            fmt_rate(worst.detection_rate)
        ));
    }

    if !report.empty_files.is_empty() {
        md.push_str("\n### Skipped Files\n\n");
        for name in &report.empty_files {
            md.push_str(&format!("- `{}` (empty)\n", name));
        }
    }

    md
}

/// Render the detection-rate report
pub fn render_detection(report: &DetectionReport) -> Result<RenderedReport> {
    let table = summary_table(report);

    Ok(RenderedReport {
        kind: ReportKind::Detection,
        console: console(report, &table),
        markdown: markdown(report, &table),
        json: serde_json::to_value(report)?,
    })
}
