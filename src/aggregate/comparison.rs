// Detector-comparison mode: scenario × detector grid of detection rates
//
// Rates use only runs that did not time out, since a timed-out run neither
// confirms nor refutes detection. A cell whose runs all timed out is null,
// never zero.

use super::{mean_present, percentage, ClassifiedFile};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics for one (scenario, detector column) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonCell {
    /// Runs that finished within the time budget
    pub completed: usize,
    /// Completed runs that were flagged
    pub flagged: usize,
    pub timed_out: usize,
    /// `flagged / completed` as a percentage
    pub detection_rate: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    completed: usize,
    flagged: usize,
    timed_out: usize,
}

impl Tally {
    fn add_file(&mut self, input: &ClassifiedFile) {
        for row in &input.file.rows {
            if row.timed_out {
                self.timed_out += 1;
            } else {
                self.completed += 1;
                if row.flagged {
                    self.flagged += 1;
                }
            }
        }
    }

    fn cell(&self) -> Option<ComparisonCell> {
        Some(ComparisonCell {
            completed: self.completed,
            flagged: self.flagged,
            timed_out: self.timed_out,
            detection_rate: percentage(self.flagged, self.completed)?,
        })
    }
}

/// One scenario row; `cells` is aligned with [`ComparisonMatrix::columns`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub cells: Vec<Option<ComparisonCell>>,
}

impl ScenarioSummary {
    pub fn rate(&self, column: usize) -> Option<f64> {
        self.cells
            .get(column)
            .copied()
            .flatten()
            .map(|c| c.detection_rate)
    }
}

/// Best column of a scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestDetector {
    pub scenario: String,
    pub column: String,
    pub detection_rate: f64,
}

/// Mean detection rate of a column over its non-null cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAverage {
    pub column: String,
    pub average: Option<f64>,
}

/// Scenario × detector comparison grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMatrix {
    /// Column labels in display order
    pub columns: Vec<String>,
    /// Scenarios in name order
    pub scenarios: Vec<ScenarioSummary>,
}

/// Order columns by a preferred list, then remaining ones in discovery order
pub fn order_columns(preferred: &[String], discovered: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = preferred
        .iter()
        .filter(|c| discovered.contains(c))
        .cloned()
        .collect();
    for column in discovered {
        if !columns.contains(column) {
            columns.push(column.clone());
        }
    }
    columns
}

/// Index of the highest value; the first wins ties
fn first_max<I>(values: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}

impl ComparisonMatrix {
    /// Group files by scenario and tally each detector column
    ///
    /// Files from different collections that land on the same cell are merged.
    /// Empty files are skipped, and so is any scenario or column whose runs all
    /// timed out.
    pub fn from_files(files: &[ClassifiedFile], preferred: &[String]) -> Self {
        let mut tallies: BTreeMap<String, BTreeMap<String, Tally>> = BTreeMap::new();
        let mut discovered: Vec<String> = Vec::new();

        for input in files {
            if input.file.is_empty() {
                tracing::debug!("skipping empty {}", input.file.name);
                continue;
            }

            let column = input.classification.column();
            if !discovered.contains(&column) {
                discovered.push(column.clone());
            }

            tallies
                .entry(input.classification.scenario.clone())
                .or_default()
                .entry(column)
                .or_default()
                .add_file(input);
        }

        // Rows and columns with no completed run anywhere are dropped
        tallies.retain(|_, by_column| by_column.values().any(|t| t.cell().is_some()));
        discovered.retain(|c| {
            tallies
                .values()
                .any(|by_column| by_column.get(c).and_then(Tally::cell).is_some())
        });

        let columns = order_columns(preferred, &discovered);
        let scenarios = tallies
            .into_iter()
            .map(|(scenario, by_column)| ScenarioSummary {
                cells: columns
                    .iter()
                    .map(|c| by_column.get(c).and_then(Tally::cell))
                    .collect(),
                scenario,
            })
            .collect();

        Self { columns, scenarios }
    }

    /// True if at least one cell has a rate
    pub fn has_data(&self) -> bool {
        self.scenarios
            .iter()
            .any(|s| s.cells.iter().any(Option::is_some))
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Best detector for a scenario, first column in display order on ties
    pub fn best_for(&self, summary: &ScenarioSummary) -> Option<BestDetector> {
        let (index, rate) = first_max((0..self.columns.len()).map(|i| summary.rate(i)))?;
        Some(BestDetector {
            scenario: summary.scenario.clone(),
            column: self.columns[index].clone(),
            detection_rate: rate,
        })
    }

    /// Best detector of every scenario that has data
    pub fn best_by_scenario(&self) -> Vec<BestDetector> {
        self.scenarios
            .iter()
            .filter_map(|s| self.best_for(s))
            .collect()
    }

    /// Mean rate of a column over its non-null cells
    pub fn column_average(&self, column: usize) -> Option<f64> {
        mean_present(self.scenarios.iter().map(|s| s.rate(column)))
    }

    pub fn column_averages(&self) -> Vec<ColumnAverage> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| ColumnAverage {
                column: column.clone(),
                average: self.column_average(i),
            })
            .collect()
    }

    /// Column with the highest average rate
    pub fn best_overall(&self) -> Option<ColumnAverage> {
        let (index, average) =
            first_max((0..self.columns.len()).map(|i| self.column_average(i)))?;
        Some(ColumnAverage {
            column: self.columns[index].clone(),
            average: Some(average),
        })
    }
}
