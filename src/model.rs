//! Solver-independent description of a mixed-integer linear program.
//!
//! Formulations only ever append to a [`Model`]; a backend receives it read-only.

use std::fmt::{self, Display};





pub type VarId = usize;



#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableType {
    Binary,
    Integer,
    Continuous,
}



#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub kind: VariableType,
    pub lower: f64,
    pub upper: f64,
    pub label: String,
}

// Variable::Variable
impl Variable {
    #[inline]
    pub fn binary(label: impl Into<String>) -> Self {
        Variable { kind: VariableType::Binary, lower: 0.0, upper: 1.0, label: label.into() }
    }

    #[inline]
    pub fn integer(lower: f64, upper: f64, label: impl Into<String>) -> Self {
        Variable { kind: VariableType::Integer, lower, upper, label: label.into() }
    }

    #[inline]
    pub fn continuous(lower: f64, upper: f64, label: impl Into<String>) -> Self {
        Variable { kind: VariableType::Continuous, lower, upper, label: label.into() }
    }
}



#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedVariable {
    pub index: VarId,
    pub weight: f64,
}



/// Sum of weighted variables. Repeated indices are allowed and add up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpression {
    terms: Vec<WeightedVariable>,
}

// LinearExpression::LinearExpression
impl LinearExpression {
    #[inline]
    pub fn new() -> Self {
        LinearExpression { terms: Vec::new() }
    }

    #[inline]
    pub fn plus(mut self, index: VarId, weight: f64) -> Self {
        self.terms.push(WeightedVariable { index, weight });
        self
    }

    pub fn sum<'a>(self, indices: impl IntoIterator<Item = &'a VarId>) -> Self {
        self.weighted_sum(indices, 1.0)
    }

    pub fn weighted_sum<'a>(mut self, indices: impl IntoIterator<Item = &'a VarId>, weight: f64) -> Self {
        self.terms.extend(indices.into_iter().map(|&index| WeightedVariable { index, weight }));
        self
    }

    #[inline]
    pub fn terms(&self) -> &[WeightedVariable] {
        &self.terms
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|x| x.weight * values[x.index]).sum()
    }

    pub fn leq(self, rhs: f64, label: impl Into<String>) -> Constraint {
        Constraint { kind: ConstraintType::LessThanEq, expression: self, rhs, label: label.into() }
    }

    pub fn eq(self, rhs: f64, label: impl Into<String>) -> Constraint {
        Constraint { kind: ConstraintType::Eq, expression: self, rhs, label: label.into() }
    }

    pub fn geq(self, rhs: f64, label: impl Into<String>) -> Constraint {
        Constraint { kind: ConstraintType::GreaterThanEq, expression: self, rhs, label: label.into() }
    }
}



#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintType {
    LessThanEq,
    Eq,
    GreaterThanEq,
}

// ConstraintType::Display
impl Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::LessThanEq => write!(f, "<="),
            ConstraintType::Eq => write!(f, "=="),
            ConstraintType::GreaterThanEq => write!(f, ">="),
        }
    }
}



#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintType,
    pub expression: LinearExpression,
    pub rhs: f64,
    pub label: String,
}

// Constraint::Constraint
impl Constraint {
    pub fn holds_for(&self, lhs: f64, tolerance: f64) -> bool {
        match self.kind {
            ConstraintType::LessThanEq => lhs <= self.rhs + tolerance,
            ConstraintType::Eq => (lhs - self.rhs).abs() <= tolerance,
            ConstraintType::GreaterThanEq => lhs >= self.rhs - tolerance,
        }
    }

    #[inline]
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.holds_for(self.expression.evaluate(values), tolerance)
    }
}



/// A minimisation problem.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpression,
}

// Model::Model
impl Model {
    #[inline]
    pub fn new() -> Self {
        Model::default()
    }

    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    #[inline]
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn fix_variable(&mut self, index: VarId, value: f64) {
        let variable: &mut Variable = &mut self.variables[index];
        variable.lower = value;
        variable.upper = value;
    }

    #[inline]
    pub fn set_objective(&mut self, objective: LinearExpression) {
        self.objective = objective;
    }

    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[inline]
    pub fn variable(&self, index: VarId) -> &Variable {
        &self.variables[index]
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[inline]
    pub fn objective(&self) -> &LinearExpression {
        &self.objective
    }

    #[inline]
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Labels of every bound or constraint that `values` breaks.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<String> {
        let mut answer: Vec<String> = Vec::new();
        for (variable, &value) in self.variables.iter().zip(values) {
            let integral = variable.kind == VariableType::Continuous || (value - value.round()).abs() <= tolerance;
            if value < variable.lower - tolerance || value > variable.upper + tolerance || !integral {
                answer.push(format!("bounds of {}", variable.label));
            }
        }
        for constraint in self.constraints.iter() {
            if !constraint.is_satisfied(values, tolerance) {
                answer.push(constraint.label.clone());
            }
        }
        answer
    }
}
