//! Command line of the `kmst` binary.

use std::{fs, path::PathBuf};
use clap::Parser;
use tracing::{info, warn};
use crate::{
    formulation::{FormulationConfig, ModelType, SizeConvention},
    instance::Instance,
    run_log::{self, RunRecord},
    solver::{base_solver::{BaseSolver, KmstOutcome}, benchmark::{start_benchmark, timeit}, errors::KmstError, ilp_solver::IlpSolver},
};





#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "kmst", version, about = "Minimum-weight trees on k nodes via integer programming", long_about = None)]
pub struct Args {
    /// Instance file: a header `n_nodes n_edges`, then one `edge_id v1 v2 weight` line per edge.
    #[arg(short, long, value_name = "FILE", default_value = "data/g01.dat")]
    pub file: PathBuf,

    /// Formulation to solve with: scf, mcf or mtz.
    #[arg(short, long, default_value = "scf")]
    pub model: String,

    /// Nodes to connect besides the root; 0 connects all of them.
    #[arg(short, default_value_t = 5)]
    pub k: usize,

    /// Tab-separated run log to append a row to.
    #[arg(short, long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Rounds to solve; the reported time is the mean per round.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: u32,

    /// Tighter flow capacities (scf) or potential bounds (mtz).
    #[arg(long)]
    pub strengthened: bool,

    /// Let k count tree edges between real nodes instead of reached nodes.
    #[arg(long)]
    pub count_edges: bool,

    /// Write the flow tree of an scf solution as a Graphviz digraph.
    #[arg(long, value_name = "FILE")]
    pub dot: Option<PathBuf>,

    /// Compare all formulations on seeded random instances instead of solving a file.
    #[arg(short, long)]
    pub benchmark: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

// Args::Args
impl Args {
    pub fn formulation_config(&self) -> Result<FormulationConfig, KmstError> {
        let model_type: ModelType = self.model.parse()?;
        let size_convention = if self.count_edges { SizeConvention::Edges } else { SizeConvention::Nodes };
        Ok(FormulationConfig::new(model_type, self.k).with_size_convention(size_convention).strengthened(self.strengthened))
    }
}



/// Runs what `args` ask for. Returns the outcome of the last round, or `None` in benchmark mode.
pub fn run(args: &Args) -> Result<Option<KmstOutcome>, KmstError> {
    if args.benchmark {
        start_benchmark(6, 14, 5, 1, 0)?;
        return Ok(None);
    }
    let config: FormulationConfig = args.formulation_config()?;
    let instance: Instance = Instance::from_file(&args.file)?;
    info!("Executing {} rounds of {} with {} k={}", args.rounds, args.file.display(), config.model_type, config.k);
    let mut solver: IlpSolver = IlpSolver::with_input(instance, config);
    let seconds: f64 = timeit(&mut solver, args.rounds, 0)?;
    let outcome: KmstOutcome = solver
        .get_solution()
        .cloned()
        .ok_or_else(|| KmstError::Unknown("The solver finished without an outcome.".to_string()))?;
    match &outcome {
        KmstOutcome::Solved { objective, nodes, tree } => {
            println!("{} solved the instance in {} s per round.", config.model_type, seconds);
            println!("Objective value = {}.", objective);
            if let Some(nodes) = nodes {
                println!("Branch-and-bound nodes = {}.", nodes);
            }
            print!("{}", tree.listing());
            if let Some(path) = &args.dot {
                match &tree.flow_tree {
                    Some(flow_tree) => fs::write(path, flow_tree.to_dot())?,
                    None => warn!("No flow tree to write for {}, only scf solutions carry one", config.model_type),
                }
            }
        },
        KmstOutcome::Infeasible => println!("No tree on {} nodes exists.", config.k),
    }
    if let Some(path) = &args.log {
        let record = RunRecord {
            filename: args.file.display().to_string(),
            model: config.model_type,
            nodes: config.k,
            cost: outcome.objective(),
            bb_nodes: match &outcome {
                KmstOutcome::Solved { nodes, .. } => *nodes,
                KmstOutcome::Infeasible => None,
            },
            cpu_time: seconds,
        };
        run_log::append(path, &record)?;
    }
    Ok(Some(outcome))
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::errors::UnknownModelTypeError;

    const DIAMOND: &str = "4 5\n0 0 1 1\n1 0 2 5\n2 1 2 1\n3 1 3 2\n4 2 3 1\n";

    #[test]
    fn defaults_match_the_usage_line() {
        let args = Args::try_parse_from(["kmst"]).unwrap();
        assert_eq!(args.file, PathBuf::from("data/g01.dat"));
        assert_eq!(args.model, "scf");
        assert_eq!(args.k, 5);
        assert_eq!(args.rounds, 1);
        assert_eq!(args.log, None);
        assert!(!args.benchmark);
        assert_eq!(args.formulation_config().unwrap(), FormulationConfig::new(ModelType::Scf, 5));
    }

    #[test]
    fn short_flags_are_understood() {
        let args = Args::try_parse_from(["kmst", "-f", "g02.dat", "-m", "MTZ", "-k", "0", "-l", "log.txt", "-r", "3", "--count-edges", "--strengthened"]).unwrap();
        let config = args.formulation_config().unwrap();
        assert_eq!(config.model_type, ModelType::Mtz);
        assert_eq!(config.k, 0);
        assert_eq!(config.size_convention, SizeConvention::Edges);
        assert!(config.strengthened);
        assert_eq!(args.log, Some(PathBuf::from("log.txt")));
        assert_eq!(args.rounds, 3);
        assert_eq!(Args::try_parse_from(["kmst", "-r", "300"]).unwrap().rounds, 300);
    }

    #[test]
    fn bad_command_lines_are_rejected() {
        assert!(Args::try_parse_from(["kmst", "-x"]).is_err());
        assert!(Args::try_parse_from(["kmst", "-k", "many"]).is_err());
        assert!(Args::try_parse_from(["kmst", "-r", "0"]).is_err());
        let args = Args::try_parse_from(["kmst", "-m", "flow"]).unwrap();
        assert!(matches!(args.formulation_config(), Err(KmstError::UnknownModelType(UnknownModelTypeError(x))) if x == "flow"));
    }

    #[test]
    fn run_solves_logs_and_exports() {
        let directory = tempfile::tempdir().unwrap();
        let instance_path = directory.path().join("diamond.dat");
        let log_path = directory.path().join("log.txt");
        let dot_path = directory.path().join("tree.dot");
        fs::write(&instance_path, DIAMOND).unwrap();
        let args = Args::try_parse_from([
            "kmst",
            "-f", instance_path.to_str().unwrap(),
            "-k", "2",
            "-l", log_path.to_str().unwrap(),
            "-r", "2",
            "--dot", dot_path.to_str().unwrap(),
        ]).unwrap();
        let outcome = run(&args).unwrap().unwrap();
        assert!((outcome.objective().unwrap() - 2.0).abs() < 1e-6);
        assert!(fs::read_to_string(&dot_path).unwrap().starts_with("digraph G {\n\t0;\n\t1;\n\t0 -> 1"));
        let log = fs::read_to_string(&log_path).unwrap();
        assert_eq!(log.lines().count(), 2);
        assert!(log.lines().nth(1).unwrap().starts_with(&format!("{}\tscf\t2\t2\t-\t", instance_path.display())));
    }

    #[test]
    fn missing_instances_fail() {
        let directory = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from(["kmst", "-f", directory.path().join("nope.dat").to_str().unwrap()]).unwrap();
        assert!(matches!(run(&args), Err(KmstError::Io(_))));
    }
}
