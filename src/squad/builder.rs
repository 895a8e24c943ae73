//! Translates a player pool and configuration into a binary program.

use super::config::OptimizerConfig;
use super::player::{PlayerId, PlayerPool, Position, TeamId};
use crate::milp::{BinaryModel, BoolVar, LinearExpr, Objective, VarId};
use std::collections::BTreeMap;
use tracing::debug;

/// Decision variables for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerVars {
    pub squad: VarId,
    pub start: VarId,
    pub captain: VarId,
    pub vice: VarId,
}

/// The squad selection program together with its id-keyed variable map.
///
/// Variables are keyed by [`PlayerId`] rather than pool position, so
/// extraction never depends on row order.
#[derive(Debug, Clone)]
pub struct SquadModel {
    pub model: BinaryModel,
    vars: BTreeMap<PlayerId, PlayerVars>,
}

impl SquadModel {
    /// Builds the model.
    ///
    /// Objective: `Σ points_i · (start_i + captain_i)`.
    ///
    /// Constraints: budget, squad size, exact position quota, club cap,
    /// starting size and formation, `start_i <= squad_i`, one captain and
    /// one vice drawn from distinct starters.
    pub fn build(pool: &PlayerPool, config: &OptimizerConfig) -> Self {
        let n = pool.len();
        let mut model = BinaryModel::new("squad_selection");
        let mut vars = BTreeMap::new();
        let mut objective = LinearExpr::with_capacity(2 * n);
        let mut budget = LinearExpr::with_capacity(n);
        let mut by_position: BTreeMap<Position, Vec<PlayerVars>> = BTreeMap::new();
        let mut by_team: BTreeMap<TeamId, Vec<VarId>> = BTreeMap::new();

        for p in pool.iter() {
            let id = p.id.0;
            let v = PlayerVars {
                squad: model.add_bool_var(BoolVar::new(format!("squad_{id}"))),
                start: model.add_bool_var(BoolVar::new(format!("start_{id}"))),
                captain: model.add_bool_var(BoolVar::new(format!("captain_{id}"))),
                vice: model.add_bool_var(BoolVar::new(format!("vice_{id}"))),
            };
            vars.insert(p.id, v);

            objective.add_term(v.start, p.points);
            objective.add_term(v.captain, p.points);
            budget.add_term(v.squad, f64::from(p.price.tenths()));
            by_position.entry(p.position).or_default().push(v);
            by_team.entry(p.team_id).or_default().push(v.squad);
        }
        let all: Vec<PlayerVars> = vars.values().copied().collect();

        model.set_objective(Objective::Maximize(objective));

        // Squad composition
        model.add_le("budget", budget, f64::from(config.budget.tenths()));
        model.add_eq(
            "squad_size",
            LinearExpr::sum(all.iter().map(|v| v.squad)),
            f64::from(config.squad_size),
        );
        for position in Position::ALL {
            let members = by_position.get(&position).map(Vec::as_slice).unwrap_or(&[]);
            model.add_eq(
                format!("quota_{}", position.code()),
                LinearExpr::sum(members.iter().map(|v| v.squad)),
                f64::from(config.quota.get(position)),
            );
        }
        for (team, squad_vars) in &by_team {
            model.add_le(
                format!("club_cap_{team}"),
                LinearExpr::sum(squad_vars.iter().copied()),
                f64::from(config.club_cap),
            );
        }

        // Starting lineup
        let formation = &config.formation;
        let starters_at = |position: Position| {
            let members = by_position.get(&position).map(Vec::as_slice).unwrap_or(&[]);
            LinearExpr::sum(members.iter().map(|v| v.start))
        };
        model.add_eq(
            "starters",
            LinearExpr::sum(all.iter().map(|v| v.start)),
            f64::from(formation.starters),
        );
        model.add_eq(
            "starting_GK",
            starters_at(Position::Goalkeeper),
            f64::from(formation.goalkeepers),
        );
        model.add_ge(
            "starting_DEF_min",
            starters_at(Position::Defender),
            f64::from(formation.min_defenders),
        );
        model.add_ge(
            "starting_FWD_min",
            starters_at(Position::Forward),
            f64::from(formation.min_forwards),
        );

        // Captaincy
        model.add_eq("one_captain", LinearExpr::sum(all.iter().map(|v| v.captain)), 1.0);
        model.add_eq("one_vice", LinearExpr::sum(all.iter().map(|v| v.vice)), 1.0);

        for (id, v) in &vars {
            model.add_le(
                format!("start_in_squad_{id}"),
                LinearExpr::new().with_term(v.start, 1.0).with_term(v.squad, -1.0),
                0.0,
            );
            model.add_le(
                format!("captain_starts_{id}"),
                LinearExpr::new().with_term(v.captain, 1.0).with_term(v.start, -1.0),
                0.0,
            );
            model.add_le(
                format!("vice_starts_{id}"),
                LinearExpr::new().with_term(v.vice, 1.0).with_term(v.start, -1.0),
                0.0,
            );
            model.add_le(
                format!("captain_not_vice_{id}"),
                LinearExpr::sum([v.captain, v.vice]),
                1.0,
            );
        }

        debug!(
            players = n,
            teams = by_team.len(),
            variables = model.var_count(),
            constraints = model.constraint_count(),
            "built squad model"
        );

        Self { model, vars }
    }

    /// Variables for `id`, if the player is in the model.
    pub fn vars(&self, id: PlayerId) -> Option<&PlayerVars> {
        self.vars.get(&id)
    }

    /// All (player, variables) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &PlayerVars)> {
        self.vars.iter().map(|(id, v)| (*id, v))
    }

    pub fn player_count(&self) -> usize {
        self.vars.len()
    }
}
