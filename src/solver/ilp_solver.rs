use tracing::{info, warn};
use crate::{decoder::{self, SelectedTree}, formulation::{Formulation, FormulationBuilder, FormulationConfig}, instance::Instance};
use super::{base_solver::{BaseSolver, KmstOutcome, SolveOutcome, SolverAdapter}, errors::KmstError, microlp_solver::MicroLpAdapter};





/// Solves k-MST instances by building the configured formulation and handing it to a backend.
/// Every call to `solve` starts from a fresh model.
pub struct IlpSolver<A: SolverAdapter = MicroLpAdapter> {
    input: Instance,
    config: FormulationConfig,
    adapter: A,
    solution: Option<KmstOutcome>,
}

// IlpSolver::IlpSolver
impl<A: SolverAdapter> IlpSolver<A> {
    pub fn with_adapter(input: Instance, config: FormulationConfig, adapter: A) -> Self {
        IlpSolver { input, config, adapter, solution: None }
    }
}

// IlpSolver::BaseSolver
impl<A: SolverAdapter + Default> BaseSolver for IlpSolver<A> {
    fn with_input(input: Instance, config: FormulationConfig) -> Self {
        IlpSolver::with_adapter(input, config, A::default())
    }

    fn get_solution(&self) -> Option<&KmstOutcome> {
        self.solution.as_ref()
    }

    fn solve(&mut self) -> Result<(), KmstError> {
        self.solution = None;
        let formulation: Formulation = FormulationBuilder::new(&self.input, self.config).build();
        let outcome: KmstOutcome = match self.adapter.solve(&formulation.model) {
            SolveOutcome::Solved(solution) => {
                let tree: SelectedTree = decoder::decode(&self.input, &formulation, &solution)?;
                info!(
                    "{} found a {} tree of weight {} with {} arcs",
                    self.adapter.name(),
                    self.config.model_type,
                    solution.objective,
                    tree.arcs.len()
                );
                KmstOutcome::Solved { objective: solution.objective, nodes: solution.nodes, tree }
            },
            SolveOutcome::Infeasible => {
                warn!("No tree with {} arcs exists in this instance", formulation.arc_target);
                KmstOutcome::Infeasible
            },
            SolveOutcome::SolverError(error) => return Err(error.into()),
        };
        self.solution = Some(outcome);
        Ok(())
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formulation::ModelType, model::Model, solver::errors::SolverError};

    fn diamond() -> Instance {
        "4 5\n0 0 1 1\n1 0 2 5\n2 1 2 1\n3 1 3 2\n4 2 3 1\n".parse().unwrap()
    }

    #[derive(Default)]
    struct BrokenAdapter;

    // BrokenAdapter::SolverAdapter
    impl SolverAdapter for BrokenAdapter {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn solve(&self, _model: &Model) -> SolveOutcome {
            SolveOutcome::SolverError(SolverError::Backend("license expired".to_string()))
        }
    }

    #[test]
    fn solution_is_empty_before_solving() {
        let solver: IlpSolver = IlpSolver::with_input(diamond(), FormulationConfig::new(ModelType::Scf, 2));
        assert!(solver.get_solution().is_none());
    }

    #[test]
    fn solves_the_diamond() {
        let mut solver: IlpSolver = IlpSolver::with_input(diamond(), FormulationConfig::new(ModelType::Mtz, 3));
        solver.solve().unwrap();
        let outcome = solver.get_solution().unwrap();
        assert!((outcome.objective().unwrap() - 3.0).abs() < 1e-6);
        assert_eq!(outcome.tree().unwrap().total_weight(), 3);
    }

    #[test]
    fn reports_infeasible_targets() {
        let mut solver: IlpSolver = IlpSolver::with_input(diamond(), FormulationConfig::new(ModelType::Scf, 4));
        solver.solve().unwrap();
        assert_eq!(solver.get_solution(), Some(&KmstOutcome::Infeasible));
    }

    #[test]
    fn backend_failures_propagate() {
        let mut solver: IlpSolver<BrokenAdapter> = IlpSolver::with_input(diamond(), FormulationConfig::new(ModelType::Mcf, 2));
        let error = solver.solve().unwrap_err();
        assert_eq!(error.to_string(), SolverError::Backend("license expired".to_string()).to_string());
        assert!(solver.get_solution().is_none());
    }
}
