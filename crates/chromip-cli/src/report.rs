//! Report records printed by the `solve` and `compare` commands.

use std::collections::BTreeMap;

use chromip_coloring::{ColoringModel, ColoringOutcome};
use chromip_core::model::format_ascii_number;
use chromip_tools::StageMeasurement;
use serde::Serialize;

/// One solved formulation, as printed by `chromip solve`.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub graph: String,
    pub model: String,
    pub presolving: bool,
    pub result: String,
    pub objective: f64,
    pub colors_used: usize,
    pub chromatic_number: Option<u32>,
    pub coloring: BTreeMap<u32, u32>,
    pub solve_ms: f64,
    pub metadata: BTreeMap<String, String>,
}

impl SolveReport {
    pub fn new(graph: &str, presolving: bool, outcome: &ColoringOutcome) -> Self {
        Self {
            graph: graph.to_string(),
            model: outcome.formulation.to_string(),
            presolving,
            result: outcome.status.as_str().to_string(),
            objective: outcome.objective,
            colors_used: outcome.colors_used(),
            chromatic_number: outcome.chromatic_number(),
            coloring: outcome.coloring.iter().collect(),
            solve_ms: outcome.solve_time.as_secs_f64() * 1000.0,
            metadata: outcome.metadata.clone(),
        }
    }

    pub fn print_table(&self) {
        println!("graph: {}", self.graph);
        println!("model: {}", self.model);
        println!("presolving: {}", self.presolving);
        println!("result: {}", self.result);
        println!("objective: {}", format_ascii_number(self.objective));
        println!("colors used: {}", self.colors_used);
        println!("solve ms: {:.3}", self.solve_ms);
    }
}

/// One row of `chromip compare`.
#[derive(Debug, Clone, Serialize)]
pub struct CompareRow {
    pub formulation: String,
    pub variables: usize,
    pub constraints: usize,
    pub nonzeros: usize,
    pub build_ms: f64,
    pub solve_ms: f64,
    pub rss_mib: Option<f64>,
    pub status: String,
    pub objective: f64,
    pub chromatic_number: Option<u32>,
}

impl CompareRow {
    pub fn new(built: &ColoringModel, outcome: &ColoringOutcome, solve: &StageMeasurement) -> Self {
        let model = built.model();
        Self {
            formulation: built.formulation().to_string(),
            variables: model.num_variables(),
            constraints: model.num_constraints(),
            nonzeros: model.num_coefficients(),
            build_ms: built.build_time().as_secs_f64() * 1000.0,
            solve_ms: solve.millis(),
            rss_mib: solve.rss_mib,
            status: outcome.status.as_str().to_string(),
            objective: outcome.objective,
            chromatic_number: outcome.chromatic_number(),
        }
    }
}

pub fn print_compare_table(graph: &str, rows: &[CompareRow]) {
    println!("graph: {graph}");
    println!(
        "{:<8} {:>10} {:>12} {:>10} {:>10} {:>10} {:>10} {:<12} {:>10}",
        "model",
        "variables",
        "constraints",
        "nonzeros",
        "build_ms",
        "solve_ms",
        "rss_mib",
        "result",
        "objective"
    );
    for row in rows {
        println!(
            "{:<8} {:>10} {:>12} {:>10} {:>10.3} {:>10.3} {:>10} {:<12} {:>10}",
            row.formulation,
            row.variables,
            row.constraints,
            row.nonzeros,
            row.build_ms,
            row.solve_ms,
            format_option_mib(row.rss_mib),
            row.status,
            format_ascii_number(row.objective),
        );
    }
}

/// Optimal objectives that differ between rows, or `None` when they agree.
pub fn disagreement(rows: &[CompareRow]) -> Option<String> {
    let mut optima: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for row in rows {
        if let Some(value) = row.chromatic_number {
            optima.entry(value).or_default().push(&row.formulation);
        }
    }
    if optima.len() <= 1 {
        return None;
    }
    let detail = optima
        .iter()
        .map(|(value, names)| format!("{} -> {value}", names.join("/")))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("formulations disagree on the chromatic number: {detail}"))
}

fn format_option_mib(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |mib| format!("{mib:.1}"))
}
