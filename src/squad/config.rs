//! Optimizer configuration: budget, quotas, club cap and formation rules.

use super::player::{Position, Price};
use crate::milp::SolverConfig;

/// Exact number of squad players required per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PositionQuota {
    pub goalkeepers: u32,
    pub defenders: u32,
    pub midfielders: u32,
    pub forwards: u32,
}

impl Default for PositionQuota {
    fn default() -> Self {
        Self {
            goalkeepers: 2,
            defenders: 5,
            midfielders: 5,
            forwards: 3,
        }
    }
}

impl PositionQuota {
    pub fn get(&self, position: Position) -> u32 {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn total(&self) -> u32 {
        Position::ALL.iter().map(|&p| self.get(p)).sum()
    }
}

/// Starting-lineup rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormationRules {
    /// Number of starters.
    pub starters: u32,
    /// Exact number of starting goalkeepers.
    pub goalkeepers: u32,
    /// Minimum number of starting defenders.
    pub min_defenders: u32,
    /// Minimum number of starting forwards.
    pub min_forwards: u32,
}

impl Default for FormationRules {
    fn default() -> Self {
        Self {
            starters: 11,
            goalkeepers: 1,
            min_defenders: 3,
            min_forwards: 1,
        }
    }
}

/// Configuration for a squad optimization.
///
/// # Examples
///
/// ```
/// use fpl_squad::squad::{OptimizerConfig, Price};
///
/// let config = OptimizerConfig::default()
///     .with_budget(Price::from_tenths(995))
///     .with_club_cap(2)
///     .with_time_limit_ms(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerConfig {
    /// Maximum total squad cost.
    pub budget: Price,

    /// Squad size. Must equal `quota.total()`.
    pub squad_size: u32,

    /// Exact squad composition per position.
    pub quota: PositionQuota,

    /// Maximum squad players from one club.
    pub club_cap: u32,

    /// Starting-lineup rules.
    pub formation: FormationRules,

    /// Backend settings, including the wall-clock limit.
    pub solver: SolverConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            budget: Price::from_tenths(1000),
            squad_size: 15,
            quota: PositionQuota::default(),
            club_cap: 3,
            formation: FormationRules::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn with_budget(mut self, budget: Price) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_squad_size(mut self, n: u32) -> Self {
        self.squad_size = n;
        self
    }

    pub fn with_quota(mut self, quota: PositionQuota) -> Self {
        self.quota = quota;
        self
    }

    pub fn with_club_cap(mut self, cap: u32) -> Self {
        self.club_cap = cap;
        self
    }

    pub fn with_formation(mut self, formation: FormationRules) -> Self {
        self.formation = formation;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.solver.time_limit_ms = ms;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.budget.is_zero() {
            return Err("budget must be positive".into());
        }
        if self.squad_size == 0 {
            return Err("squad_size must be at least 1".into());
        }
        if self.quota.total() != self.squad_size {
            return Err(format!(
                "position quota sums to {}, expected squad_size {}",
                self.quota.total(),
                self.squad_size
            ));
        }
        if self.club_cap == 0 {
            return Err("club_cap must be at least 1".into());
        }

        let f = &self.formation;
        if f.starters == 0 || f.starters > self.squad_size {
            return Err(format!(
                "starters must be in 1..={}, got {}",
                self.squad_size, f.starters
            ));
        }
        if f.goalkeepers > self.quota.goalkeepers {
            return Err("starting goalkeepers exceed the goalkeeper quota".into());
        }
        if f.min_defenders > self.quota.defenders {
            return Err("minimum starting defenders exceed the defender quota".into());
        }
        if f.min_forwards > self.quota.forwards {
            return Err("minimum starting forwards exceed the forward quota".into());
        }
        if f.goalkeepers + f.min_defenders + f.min_forwards > f.starters {
            return Err("formation minimums exceed the number of starters".into());
        }
        // Captain and vice must be two different starters.
        if f.starters < 2 {
            return Err("at least two starters are needed for captain and vice".into());
        }
        if self.squad_size - self.quota.goalkeepers < f.starters - f.goalkeepers {
            return Err("not enough outfield squad places to fill the starting lineup".into());
        }

        self.solver.validate()
    }
}

#[cfg(feature = "serde")]
pub use toml_support::ConfigError;

#[cfg(feature = "serde")]
mod toml_support {
    use super::OptimizerConfig;
    use std::path::Path;
    use thiserror::Error;

    /// Configuration loading error.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("TOML parse error: {0}")]
        Toml(#[from] toml::de::Error),

        #[error("Invalid configuration: {0}")]
        Invalid(String),
    }

    impl OptimizerConfig {
        /// Loads configuration from a TOML file.
        pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        }

        /// Parses and validates configuration from a TOML string.
        ///
        /// Missing keys fall back to defaults; `budget` is written in
        /// millions (e.g. `budget = 99.5`).
        pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
            let config: OptimizerConfig = toml::from_str(s)?;
            config.validate().map_err(ConfigError::Invalid)?;
            Ok(config)
        }
    }
}
