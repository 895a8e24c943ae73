//! Squad optimization entry points.

use super::builder::SquadModel;
use super::config::OptimizerConfig;
use super::extract::SquadSelection;
use super::horizon::{Horizon, ProjectionTable};
use super::player::{PlayerPool, PlayerRecord};
use crate::error::{Result, SquadError};
use crate::milp::{MicroLpSolver, MilpSolver, SolverStatus};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

/// Outcome of one optimization call.
#[derive(Debug, Clone, PartialEq)]
pub enum SquadOutcome {
    /// An optimal, validated selection.
    Optimal(SquadSelection),
    /// No squad satisfies the constraints.
    Infeasible,
    /// The solver did not finish within `limit_ms`.
    Timeout { limit_ms: u64 },
}

impl SquadOutcome {
    pub fn status(&self) -> SolverStatus {
        match self {
            SquadOutcome::Optimal(_) => SolverStatus::Optimal,
            SquadOutcome::Infeasible => SolverStatus::Infeasible,
            SquadOutcome::Timeout { .. } => SolverStatus::Timeout,
        }
    }

    pub fn selection(&self) -> Option<&SquadSelection> {
        match self {
            SquadOutcome::Optimal(selection) => Some(selection),
            _ => None,
        }
    }

    /// Converts non-optimal outcomes into [`SquadError::Infeasible`] /
    /// [`SquadError::SolverTimeout`].
    pub fn into_result(self) -> Result<SquadSelection> {
        match self {
            SquadOutcome::Optimal(selection) => Ok(selection),
            SquadOutcome::Infeasible => Err(SquadError::Infeasible),
            SquadOutcome::Timeout { limit_ms } => Err(SquadError::SolverTimeout { limit_ms }),
        }
    }
}

/// Selects the squad maximizing projected points under the configured
/// budget, quota, club cap and formation rules.
///
/// Holds no state between calls; one optimizer can serve concurrent
/// callers.
///
/// # Examples
///
/// ```
/// use fpl_squad::squad::{
///     OptimizerConfig, PlayerId, PlayerRecord, Position, Price, SquadOptimizer, TeamId,
/// };
///
/// let layout = [
///     (Position::Goalkeeper, 2),
///     (Position::Defender, 5),
///     (Position::Midfielder, 5),
///     (Position::Forward, 3),
/// ];
/// let mut records = Vec::new();
/// for (pos, n) in layout {
///     for _ in 0..n {
///         let id = records.len() as u32 + 1;
///         records.push(PlayerRecord::new(
///             PlayerId(id),
///             format!("player {id}"),
///             TeamId(id),
///             pos,
///             Price::from_tenths(55),
///             Some(f64::from(id)),
///         ));
///     }
/// }
///
/// let outcome = SquadOptimizer::new()
///     .optimize(records, &OptimizerConfig::default())
///     .unwrap();
/// let selection = outcome.into_result().unwrap();
/// assert_eq!(selection.squad.len(), 15);
/// assert_eq!(selection.captain, PlayerId(15));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SquadOptimizer<S = MicroLpSolver> {
    solver: S,
}

impl SquadOptimizer<MicroLpSolver> {
    /// Optimizer backed by [`MicroLpSolver`].
    pub fn new() -> Self {
        Self {
            solver: MicroLpSolver::new(),
        }
    }
}

impl<S: MilpSolver> SquadOptimizer<S> {
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }

    /// Validates the configuration and records, then optimizes.
    ///
    /// Records without projected points are dropped first.
    pub fn optimize(
        &self,
        records: impl IntoIterator<Item = PlayerRecord>,
        config: &OptimizerConfig,
    ) -> Result<SquadOutcome> {
        config.validate().map_err(SquadError::Configuration)?;
        let pool = PlayerPool::from_records(records)?;
        self.optimize_pool(&pool, config)
    }

    /// Optimizes over an already validated pool.
    pub fn optimize_pool(
        &self,
        pool: &PlayerPool,
        config: &OptimizerConfig,
    ) -> Result<SquadOutcome> {
        config.validate().map_err(SquadError::Configuration)?;

        let model = SquadModel::build(pool, config);
        info!(
            event = "solve_start",
            players = pool.len(),
            variables = model.model.var_count(),
            constraints = model.model.constraint_count(),
            budget = %config.budget,
            time_limit_ms = config.solver.time_limit_ms,
        );

        let solution = self.solver.solve(&model.model, &config.solver)?;
        let outcome = match solution.status {
            SolverStatus::Optimal => {
                let selection = SquadSelection::extract(pool, &model, &solution, config)?;
                info!(
                    event = "solve_end",
                    status = "optimal",
                    total_points = selection.total_points,
                    total_cost = %selection.total_cost,
                    solve_time_ms = solution.solve_time_ms,
                );
                SquadOutcome::Optimal(selection)
            }
            SolverStatus::Infeasible => {
                info!(
                    event = "solve_end",
                    status = "infeasible",
                    solve_time_ms = solution.solve_time_ms,
                );
                SquadOutcome::Infeasible
            }
            SolverStatus::Timeout => {
                info!(
                    event = "solve_end",
                    status = "timeout",
                    solve_time_ms = solution.solve_time_ms,
                );
                SquadOutcome::Timeout {
                    limit_ms: config.solver.time_limit_ms,
                }
            }
        };
        Ok(outcome)
    }

    /// Runs one independent optimization per horizon over the same records.
    ///
    /// Each horizon's points come from `table` (see [`Horizon::apply`]).
    /// With the `parallel` feature the horizons are solved concurrently.
    /// Results are returned in the order of `horizons`.
    pub fn optimize_horizons(
        &self,
        records: &[PlayerRecord],
        table: &ProjectionTable,
        horizons: &[Horizon],
        config: &OptimizerConfig,
    ) -> Vec<(Horizon, Result<SquadOutcome>)> {
        let run = |horizon: &Horizon| {
            let projected = horizon.apply(records.iter().cloned(), table);
            (*horizon, self.optimize(projected, config))
        };

        #[cfg(feature = "parallel")]
        {
            horizons.par_iter().map(run).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            horizons.iter().map(run).collect()
        }
    }
}

/// Optimizes with the default solver.
pub fn optimize(
    records: impl IntoIterator<Item = PlayerRecord>,
    config: &OptimizerConfig,
) -> Result<SquadOutcome> {
    SquadOptimizer::new().optimize(records, config)
}
