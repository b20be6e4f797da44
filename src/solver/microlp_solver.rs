use good_lp::{solvers::microlp::microlp, variable, Expression, IntoAffineExpression, ProblemVariables, ResolutionError, Solution as _, SolverModel, Variable as LpVariable};
use tracing::{debug, error, info};
use crate::model::{ConstraintType, LinearExpression, Model, VariableType};
use super::{base_solver::{SolveOutcome, Solution, SolverAdapter}, errors::SolverError};





const TOLERANCE: f64 = 1e-9;



macro_rules! extract_unwrap {
    ($expr: expr) => {
        match $expr {
            Ok(value) => value,
            Err(error) => {
                error!("{}", error);
                return SolveOutcome::SolverError(error);
            },
        }
    };
}



/// Pure-Rust branch-and-bound through `good_lp`'s microlp backend. It runs on the calling
/// thread only, so repeated solves of one model take identical paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicroLpAdapter;

// MicroLpAdapter::MicroLpAdapter
impl MicroLpAdapter {
    // Collects every construct the backend could not represent instead of stopping at the first.
    fn validate(model: &Model) -> Result<(), SolverError> {
        let n_variables: usize = model.variables().len();
        let mut constructs: Vec<String> = Vec::new();
        for variable in model.variables() {
            let binary_range = variable.kind != VariableType::Binary || (variable.lower >= 0.0 && variable.upper <= 1.0);
            if !variable.lower.is_finite() || !variable.upper.is_finite() || variable.lower > variable.upper || !binary_range {
                constructs.push(format!("bounds of {} [{}, {}]", variable.label, variable.lower, variable.upper));
            }
        }
        let broken_expression = |expression: &LinearExpression| {
            expression.terms().iter().any(|x| x.index >= n_variables || !x.weight.is_finite())
        };
        for constraint in model.constraints() {
            if broken_expression(&constraint.expression) || !constraint.rhs.is_finite() {
                constructs.push(constraint.label.clone());
            }
        }
        if broken_expression(model.objective()) {
            constructs.push("objective".to_string());
        }
        if constructs.is_empty() {
            Ok(())
        } else {
            Err(SolverError::CannotExtract { constructs })
        }
    }

    fn to_expression(expression: &LinearExpression, columns: &[LpVariable]) -> Expression {
        let mut answer: Expression = 0.into();
        for term in expression.terms() {
            answer += columns[term.index].into_expression() * term.weight;
        }
        answer
    }
}

// MicroLpAdapter::SolverAdapter
impl SolverAdapter for MicroLpAdapter {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: &Model) -> SolveOutcome {
        extract_unwrap!(Self::validate(model));
        let mut problem_variables: ProblemVariables = ProblemVariables::new();
        let columns: Vec<LpVariable> = model
            .variables()
            .iter()
            .map(|x| {
                let definition = match x.kind {
                    VariableType::Binary | VariableType::Integer => variable().integer(),
                    VariableType::Continuous => variable(),
                };
                problem_variables.add(definition.min(x.lower).max(x.upper).name(x.label.clone()))
            })
            .collect();
        let mut problem = problem_variables.minimise(Self::to_expression(model.objective(), &columns)).using(microlp);
        let mut dropped: usize = 0;
        for constraint in model.constraints() {
            // Rows without terms are decided here, the backend never sees them.
            if constraint.expression.is_empty() {
                if !constraint.holds_for(0.0, TOLERANCE) {
                    info!("Constraint {} reads 0 {} {}, the model is infeasible", constraint.label, constraint.kind, constraint.rhs);
                    return SolveOutcome::Infeasible;
                }
                dropped += 1;
                continue;
            }
            let lhs: Expression = Self::to_expression(&constraint.expression, &columns);
            problem.add_constraint(match constraint.kind {
                ConstraintType::LessThanEq => lhs.leq(constraint.rhs),
                ConstraintType::Eq => lhs.eq(constraint.rhs),
                ConstraintType::GreaterThanEq => lhs.geq(constraint.rhs),
            });
        }
        if columns.is_empty() {
            return SolveOutcome::Solved(Solution { objective: 0.0, nodes: None, values: Vec::new() });
        }
        debug!("Handing {} variables and {} constraints to microlp ({} trivial rows dropped)", columns.len(), model.constraints().len() - dropped, dropped);
        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = columns.iter().map(|&x| solution.value(x)).collect();
                let objective: f64 = model.objective_value(&values);
                SolveOutcome::Solved(Solution { objective, nodes: None, values: values.into_iter().map(Some).collect() })
            },
            Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
            Err(error) => {
                let error = SolverError::Backend(error.to_string());
                error!("{}", error);
                SolveOutcome::SolverError(error)
            },
        }
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variable;

    fn knapsack() -> Model {
        // max 3a + 2b + 2c s.t. 2a + 2b + c <= 3, written as a minimisation
        let mut model = Model::new();
        let a = model.add_variable(Variable::binary("a"));
        let b = model.add_variable(Variable::binary("b"));
        let c = model.add_variable(Variable::binary("c"));
        model.add_constraint(LinearExpression::new().plus(a, 2.0).plus(b, 2.0).plus(c, 1.0).leq(3.0, "capacity"));
        model.set_objective(LinearExpression::new().plus(a, -3.0).plus(b, -2.0).plus(c, -2.0));
        model
    }

    #[test]
    fn solves_a_small_integer_program() {
        let SolveOutcome::Solved(solution) = MicroLpAdapter.solve(&knapsack()) else {
            panic!("expected a solution");
        };
        assert!((solution.objective + 5.0).abs() < 1e-6);
        assert_eq!(solution.nodes, None);
        assert!((solution.value(0).unwrap() - 1.0).abs() < 1e-6);
        assert!((solution.value(2).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn respects_fixed_variables() {
        let mut model = knapsack();
        model.fix_variable(0, 0.0);
        let SolveOutcome::Solved(solution) = MicroLpAdapter.solve(&model) else {
            panic!("expected a solution");
        };
        assert!((solution.objective + 4.0).abs() < 1e-6);
    }

    #[test]
    fn reports_infeasibility() {
        let mut model = knapsack();
        model.add_constraint(LinearExpression::new().sum(&[0, 1, 2]).geq(3.0, "all"));
        assert_eq!(MicroLpAdapter.solve(&model), SolveOutcome::Infeasible);
    }

    #[test]
    fn decides_constant_rows_without_the_backend() {
        let mut model = knapsack();
        model.add_constraint(LinearExpression::new().leq(1.0, "trivially true"));
        assert!(matches!(MicroLpAdapter.solve(&model), SolveOutcome::Solved(_)));
        model.add_constraint(LinearExpression::new().eq(2.0, "trivially false"));
        assert_eq!(MicroLpAdapter.solve(&model), SolveOutcome::Infeasible);
    }

    #[test]
    fn empty_models_are_solved_trivially() {
        let mut model = Model::new();
        model.add_constraint(LinearExpression::new().eq(0.0, "size"));
        assert_eq!(MicroLpAdapter.solve(&model), SolveOutcome::Solved(Solution { objective: 0.0, nodes: None, values: Vec::new() }));
    }

    #[test]
    fn lists_every_offending_construct() {
        let mut model = knapsack();
        model.add_variable(Variable::continuous(2.0, 1.0, "inverted"));
        model.add_constraint(LinearExpression::new().plus(42, 1.0).leq(1.0, "dangling"));
        model.add_constraint(LinearExpression::new().plus(0, f64::NAN).leq(1.0, "nan"));
        let SolveOutcome::SolverError(SolverError::CannotExtract { constructs }) = MicroLpAdapter.solve(&model) else {
            panic!("expected an extraction failure");
        };
        assert_eq!(constructs, vec!["bounds of inverted [2, 1]", "dangling", "nan"]);
    }
}
