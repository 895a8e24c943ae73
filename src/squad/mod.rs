//! Fantasy squad selection.
//!
//! Chooses a 15-player squad, its starting XI, captain and vice-captain so
//! that projected points (captain counted twice) are maximal, subject to a
//! budget, an exact position quota, a per-club cap and formation rules.
//!
//! # Key Components
//!
//! - **Pool**: [`PlayerRecord`] input, validated into a [`PlayerPool`]
//! - **Config**: [`OptimizerConfig`] — budget, [`PositionQuota`], club cap,
//!   [`FormationRules`], solver time limit
//! - **Horizon**: [`Horizon`] and [`ProjectionTable`] — single-period or
//!   N-period projected points
//! - **Model**: [`SquadModel`] — the binary program, keyed by player id
//! - **Result**: [`SquadSelection`], re-validated after every solve
//! - **Optimizer**: [`SquadOptimizer`] returning a [`SquadOutcome`]
//! - **Report**: [`SquadReport`] text rendering
//!
//! # Pipeline
//!
//! records + config → pool → model → solver → extracted selection. Each
//! call builds everything fresh; nothing is cached between calls.

mod builder;
mod config;
mod extract;
mod horizon;
mod optimizer;
mod player;
mod report;

pub use builder::{PlayerVars, SquadModel};
#[cfg(feature = "serde")]
pub use config::ConfigError;
pub use config::{FormationRules, OptimizerConfig, PositionQuota};
pub use extract::SquadSelection;
pub use horizon::{next_open_period, Horizon, ProjectionTable};
pub use optimizer::{optimize, SquadOptimizer, SquadOutcome};
pub use player::{PlayerId, PlayerPool, PlayerRecord, PoolPlayer, Position, Price, TeamId};
pub use report::SquadReport;
