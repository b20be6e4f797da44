pub mod base_solver;
pub mod benchmark;
pub mod errors;
pub mod ilp_solver;
pub mod microlp_solver;
