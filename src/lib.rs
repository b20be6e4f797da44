//! Minimum-weight k-node subtrees (k-MST) solved through integer linear programming.
//!
//! An [`instance::Instance`] is turned into a [`model::Model`] by a
//! [`formulation::FormulationBuilder`], solved by a [`solver::base_solver::SolverAdapter`] and
//! read back into a [`decoder::SelectedTree`].

pub mod arcs;
pub mod cli;
pub mod decoder;
pub mod formulation;
pub mod instance;
pub mod model;
pub mod run_log;
pub mod solver;
