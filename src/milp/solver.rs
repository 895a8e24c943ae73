//! MILP solver interface and the bundled `good_lp` backend.

use super::model::{BinaryModel, Objective, Sense};
use super::variables::LinearExpr;
use good_lp::solvers::microlp::microlp;
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Tolerance used when checking constant-only constraints.
const CONSTANT_TOL: f64 = 1e-9;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No assignment satisfies all constraints.
    Infeasible,
    /// Solver exceeded its time limit.
    Timeout,
}

/// Failures that are not a normal solver outcome.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("model is invalid: {0}")]
    ModelInvalid(String),

    #[error("solver backend failed: {0}")]
    Backend(String),
}

/// Solution from a MILP solver.
#[derive(Debug, Clone)]
pub struct MilpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective value, present when `status` is `Optimal`.
    pub objective_value: Option<f64>,
    /// Raw variable values indexed by [`VarId`](super::VarId). Empty unless optimal.
    pub values: Vec<f64>,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl MilpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            solve_time_ms: 0,
        }
    }

    /// Whether an optimal assignment is available.
    pub fn is_optimal(&self) -> bool {
        self.status == SolverStatus::Optimal
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Wall-clock limit in milliseconds after which the solve reports `Timeout`.
    pub time_limit_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be positive".into());
        }
        Ok(())
    }
}

/// Trait for MILP solver implementations.
///
/// Implementors translate a [`BinaryModel`] into a backend problem and
/// report one of the three [`SolverStatus`] outcomes. Anything else
/// (malformed model, backend crash) is a [`SolverError`].
pub trait MilpSolver: Send + Sync {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &BinaryModel, config: &SolverConfig)
        -> Result<MilpSolution, SolverError>;
}

/// Branch-and-bound solver backed by `good_lp` with the pure-Rust
/// `microlp` engine.
///
/// The backend has no time limit of its own, so each solve runs on a
/// dedicated worker thread and the caller waits at most
/// `config.time_limit_ms`. On timeout the worker is detached and left to
/// finish in the background; its result is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for MicroLpSolver {
    fn solve(
        &self,
        model: &BinaryModel,
        config: &SolverConfig,
    ) -> Result<MilpSolution, SolverError> {
        model.validate().map_err(SolverError::ModelInvalid)?;
        config.validate().map_err(SolverError::ModelInvalid)?;

        let start = Instant::now();
        let owned = model.clone();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name(format!("milp-{}", model.name))
            .spawn(move || {
                // The receiver is gone after a timeout; nothing left to report to.
                let _ = tx.send(solve_blocking(&owned));
            })
            .map_err(|e| SolverError::Backend(format!("failed to spawn solver thread: {e}")))?;

        match rx.recv_timeout(config.time_limit()) {
            Ok(result) => {
                let mut solution = result?;
                solution.solve_time_ms = start.elapsed().as_millis() as u64;
                debug!(
                    model = %model.name,
                    status = ?solution.status,
                    solve_time_ms = solution.solve_time_ms,
                    "milp solve finished"
                );
                Ok(solution)
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    model = %model.name,
                    time_limit_ms = config.time_limit_ms,
                    "milp solve timed out"
                );
                let mut solution = MilpSolution::empty(SolverStatus::Timeout);
                solution.solve_time_ms = start.elapsed().as_millis() as u64;
                Ok(solution)
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolverError::Backend(
                "solver thread terminated without a result".into(),
            )),
        }
    }
}

fn solve_blocking(model: &BinaryModel) -> Result<MilpSolution, SolverError> {
    let Some(objective) = &model.objective else {
        return Err(SolverError::ModelInvalid("missing objective".into()));
    };

    let mut problem_vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .vars
        .iter()
        .map(|var| {
            let mut def = variable().binary().name(var.name.as_str());
            if let Some(fixed) = var.fixed {
                let value = if fixed { 1.0 } else { 0.0 };
                def = def.min(value).max(value);
            }
            problem_vars.add(def)
        })
        .collect();

    let mut problem = match objective {
        Objective::Maximize(expr) => problem_vars.maximise(to_expression(expr, &handles)),
        Objective::Minimize(expr) => problem_vars.minimise(to_expression(expr, &handles)),
    }
    .using(microlp);

    for constraint in &model.constraints {
        // Backends reject constraints without variables; decide them here.
        if constraint.expr.is_empty() {
            if constraint.is_satisfied(&[], CONSTANT_TOL) {
                continue;
            }
            debug!(constraint = %constraint.name, "constant constraint is unsatisfiable");
            return Ok(MilpSolution::empty(SolverStatus::Infeasible));
        }
        let expr = to_expression(&constraint.expr, &handles);
        problem = problem.with(match constraint.sense {
            Sense::LessEq => expr.leq(constraint.rhs),
            Sense::Equal => expr.eq(constraint.rhs),
            Sense::GreaterEq => expr.geq(constraint.rhs),
        });
    }

    match problem.solve() {
        Ok(solution) => {
            let values: Vec<f64> = handles.iter().map(|v| solution.value(*v)).collect();
            let objective_value = objective.expr().evaluate(&values);
            Ok(MilpSolution {
                status: SolverStatus::Optimal,
                objective_value: Some(objective_value),
                values,
                solve_time_ms: 0,
            })
        }
        Err(ResolutionError::Infeasible) => Ok(MilpSolution::empty(SolverStatus::Infeasible)),
        Err(other) => Err(SolverError::Backend(other.to_string())),
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.len());
    for &(var, coef) in &expr.terms {
        out.add_mul(coef, handles[var.index()]);
    }
    out
}
