//! Binary integer programming layer.
//!
//! A small, solver-agnostic modeling layer for 0/1 linear programs plus a
//! solver adapter.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`] and [`VarId`] handles, [`LinearExpr`]
//! - **Model**: [`BinaryModel`] — container for variables, constraints, objective
//! - **Solver**: [`MilpSolver`] trait with three outcomes (optimal,
//!   infeasible, timeout); [`MicroLpSolver`] is the bundled backend
//!
//! # Design
//!
//! The model holds no solver state, so it can be cloned onto a worker
//! thread and solved there under a wall-clock limit. Domain concepts
//! (squads, positions, budgets) live in [`crate::squad`].

mod model;
mod solver;
mod variables;

pub use model::{BinaryModel, LinearConstraint, Objective, Sense};
pub use solver::{MicroLpSolver, MilpSolution, MilpSolver, SolverConfig, SolverError, SolverStatus};
pub use variables::{BoolVar, LinearExpr, VarId};
