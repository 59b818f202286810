mod logging;
mod report;

use std::path::{Path, PathBuf};

use chromip_coloring::dimacs::read_dimacs_file;
use chromip_coloring::{Formulation, Graph, build, build_all, solve};
use chromip_core::{PrettyPrintOptions, SolverConfig};
use chromip_highs::HighsSolver;
use chromip_tools::{MemorySnapshot, StageTimer};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use report::{CompareRow, SolveReport};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Chromatic number through integer-programming formulations"
)]
struct Cli {
    /// Log filter, e.g. `info` or `chromip_coloring=debug` (overrides CHROMIP_TRACE)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one formulation, solve it with HiGHS and print the result
    Solve(SolveArgs),
    /// Build and solve several formulations of the same graph
    Compare(CompareArgs),
    /// Print family counts and an ASCII rendering of one formulation
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct SolverArgs {
    /// Disable HiGHS presolve
    #[arg(long)]
    no_presolving: bool,

    /// Time limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Relative MIP gap
    #[arg(long)]
    mip_gap: Option<f64>,

    /// Solver threads
    #[arg(long)]
    threads: Option<u32>,

    /// Let HiGHS write its own log to the console
    #[arg(long)]
    solver_log: bool,
}

impl SolverArgs {
    fn config(&self) -> SolverConfig {
        let mut config = SolverConfig::new()
            .with_presolve(!self.no_presolving)
            .with_log_to_console(self.solver_log);
        if let Some(seconds) = self.time_limit {
            config = config.with_time_limit(seconds);
        }
        if let Some(gap) = self.mip_gap {
            config = config.with_mip_gap(gap);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        config
    }
}

#[derive(Parser, Debug)]
struct SolveArgs {
    /// AS, ASSB, PO or POST
    formulation: Formulation,

    /// DIMACS graph file
    graph: PathBuf,

    #[command(flatten)]
    solver: SolverArgs,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// DIMACS graph file
    graph: PathBuf,

    /// Formulations to build and solve
    #[arg(
        long = "formulation",
        value_delimiter = ',',
        default_value = "AS,ASSB,PO,POST"
    )]
    formulations: Vec<Formulation>,

    #[command(flatten)]
    solver: SolverArgs,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// AS, ASSB, PO or POST
    formulation: Formulation,

    /// DIMACS graph file
    graph: PathBuf,

    /// Print every row instead of a preview
    #[arg(long)]
    full: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;
    match cli.command {
        Command::Solve(args) => solve_command(args),
        Command::Compare(args) => compare_command(args),
        Command::Inspect(args) => inspect_command(args),
    }
}

fn solve_command(args: SolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(&args.graph)?;
    let built = build(args.formulation, &graph)?;
    let mut solver = HighsSolver::new(args.solver.config());
    let outcome = solve(&built, &mut solver)?;

    let report = SolveReport::new(
        &graph_name(&args.graph),
        !args.solver.no_presolving,
        &outcome,
    );
    match args.format {
        OutputFormat::Table => report.print_table(),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

fn compare_command(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.formulations.is_empty() {
        return Err(boxed_input_error("at least one formulation is required"));
    }
    let graph = load_graph(&args.graph)?;
    let (built, build_stage) = StageTimer::measure("build", || {
        build_all(&args.formulations, &graph)
    });
    info!(
        component = "cli",
        operation = "compare",
        status = "built",
        formulations = args.formulations.len(),
        duration_ms = build_stage.millis(),
        "Built formulations"
    );

    let mut rows = Vec::with_capacity(built.len());
    for built in built {
        let built = built?;
        let mut solver = HighsSolver::new(args.solver.config());
        let (outcome, solve_stage) = StageTimer::measure(
            format!("solve_{}", built.formulation()),
            || solve(&built, &mut solver),
        );
        rows.push(CompareRow::new(&built, &outcome?, &solve_stage));
    }

    match args.format {
        OutputFormat::Table => report::print_compare_table(&graph_name(&args.graph), &rows),
        OutputFormat::Json => print_json(&rows)?,
    }
    if let Ok(snapshot) = MemorySnapshot::capture("compare") {
        info!(
            component = "cli",
            operation = "compare",
            status = "success",
            rss_mib = snapshot.rss_mib(),
            "Finished compare"
        );
    }

    match report::disagreement(&rows) {
        Some(message) => Err(boxed_input_error(&message)),
        None => Ok(()),
    }
}

fn inspect_command(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(&args.graph)?;
    let built = build(args.formulation, &graph)?;
    let model = built.model();

    println!("graph: {}", graph_name(&args.graph));
    println!("model: {}", built.formulation());
    println!(
        "vertices: {}  edges: {}  colors: {}",
        graph.num_vertices(),
        graph.num_edges(),
        built.colors().len()
    );
    println!(
        "variables: {}  constraints: {}  nonzeros: {}",
        model.num_variables(),
        model.num_constraints(),
        model.num_coefficients()
    );
    for (family, count) in built.family_counts() {
        println!("  {:<16} {count:>8}", family.prefix());
    }
    println!();

    let options = if args.full {
        PrettyPrintOptions::full()
    } else {
        PrettyPrintOptions::preview()
    };
    println!("{}", model.format_ascii(options));
    Ok(())
}

fn load_graph(path: &Path) -> Result<Graph, Box<dyn std::error::Error>> {
    let (graph, stage) = StageTimer::measure("read_graph", || read_dimacs_file(path));
    let graph = graph?;
    info!(
        component = "cli",
        operation = "read_graph",
        status = "success",
        path = %path.display(),
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        max_degree = graph.max_degree(),
        duration_ms = stage.millis(),
        "Loaded graph"
    );
    Ok(graph)
}

/// File name of the graph, as printed in reports.
fn graph_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_arguments() {
        let cli = Cli::try_parse_from([
            "chromip",
            "solve",
            "post",
            "graphs/myciel3.col",
            "--no-presolving",
            "--time-limit",
            "30",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.formulation, Formulation::Post);
        assert_eq!(args.format, OutputFormat::Json);
        let config = args.solver.config();
        assert_eq!(config.presolve, Some(false));
        assert_eq!(config.time_limit, Some(30.0));
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_compare_defaults_to_every_formulation() {
        let cli = Cli::try_parse_from(["chromip", "compare", "g.col"]).unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.formulations, Formulation::ALL.to_vec());
        assert_eq!(args.solver.config().presolve, Some(true));

        let cli = Cli::try_parse_from(["chromip", "compare", "g.col", "--formulation", "AS,PO"])
            .unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.formulations, vec![Formulation::As, Formulation::Po]);
    }

    #[test]
    fn test_unknown_formulation_is_rejected() {
        let err = Cli::try_parse_from(["chromip", "inspect", "XYZ", "g.col"]).unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_global_log_level() {
        let cli = Cli::try_parse_from(["chromip", "inspect", "AS", "g.col", "--log-level", "debug"])
            .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_graph_name_strips_directories() {
        assert_eq!(graph_name(Path::new("data/dimacs/queen5_5.col")), "queen5_5.col");
    }
}
