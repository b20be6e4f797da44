use crate::{decoder::SelectedTree, formulation::FormulationConfig, instance::Instance, model::{Model, VarId}};
use super::errors::{ExtractionError, KmstError, SolverError};





/// Values a backend reports for a solved model. A value is `None` when the backend could not
/// extract that variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub objective: f64,
    pub nodes: Option<u64>,
    pub values: Vec<Option<f64>>,
}

// Solution::Solution
impl Solution {
    #[inline]
    pub fn value(&self, index: VarId) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn group_values(&self, group: &str, indices: &[VarId]) -> Result<Vec<f64>, ExtractionError> {
        let answer: Vec<f64> = indices.iter().filter_map(|&x| self.value(x)).collect();
        if answer.len() != indices.len() {
            return Err(ExtractionError { group: group.to_string(), missing: indices.len() - answer.len(), requested: indices.len() });
        }
        Ok(answer)
    }
}



#[derive(Clone, Debug, PartialEq)]
pub enum SolveOutcome {
    Solved(Solution),
    Infeasible,
    SolverError(SolverError),
}



/// The boundary to a mixed-integer backend: it receives a finished model and never mutates it.
pub trait SolverAdapter {
    fn name(&self) -> &'static str;
    fn solve(&self, model: &Model) -> SolveOutcome;
}



#[derive(Clone, Debug, PartialEq)]
pub enum KmstOutcome {
    Solved {
        objective: f64,
        nodes: Option<u64>,
        tree: SelectedTree,
    },
    Infeasible,
}

// KmstOutcome::KmstOutcome
impl KmstOutcome {
    #[inline]
    pub fn objective(&self) -> Option<f64> {
        match self {
            KmstOutcome::Solved { objective, .. } => Some(*objective),
            KmstOutcome::Infeasible => None,
        }
    }

    #[inline]
    pub fn tree(&self) -> Option<&SelectedTree> {
        match self {
            KmstOutcome::Solved { tree, .. } => Some(tree),
            KmstOutcome::Infeasible => None,
        }
    }
}



pub trait BaseSolver: Sized {
    fn with_input(input: Instance, config: FormulationConfig) -> Self;
    fn get_solution(&self) -> Option<&KmstOutcome>;
    fn solve(&mut self) -> Result<(), KmstError>;
}
