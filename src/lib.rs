//! Fantasy football squad optimizer.
//!
//! Selects the squad that maximizes projected points under roster, budget
//! and club constraints by solving a binary integer program:
//!
//! - **MILP layer** ([`milp`]): solver-agnostic binary model, the
//!   [`milp::MilpSolver`] trait and a pure-Rust branch-and-bound backend
//!   with a wall-clock limit.
//! - **Squad layer** ([`squad`]): player pool validation, the constraint
//!   model builder, result extraction with invariant re-checks, horizon
//!   selection and reporting.
//!
//! # Architecture
//!
//! The crate is a pure function from (player pool, configuration) to
//! (selection, status). It does not fetch projections, persist anything or
//! hold state between calls; loaders and reporting surfaces sit outside.
//!
//! # Errors
//!
//! Configuration and data problems fail before a model is built.
//! Infeasibility and timeouts are ordinary [`squad::SquadOutcome`]s. A
//! solver answer that breaks a squad invariant is
//! [`SquadError::InternalInvariant`] and is never reported as infeasible.

pub mod error;
pub mod milp;
pub mod squad;

pub use error::{Result, SquadError};
