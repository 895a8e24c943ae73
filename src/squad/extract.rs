//! Turns a raw solver assignment into a validated squad decision.

use super::builder::SquadModel;
use super::config::OptimizerConfig;
use super::player::{PlayerId, PlayerPool, Position, Price, TeamId};
use crate::error::{Result, SquadError};
use crate::milp::MilpSolution;
use std::collections::{BTreeMap, HashSet};

/// Assignment values at or above this are read as 1.
const ROUNDING_THRESHOLD: f64 = 0.5;

/// Relative tolerance between the solver's objective and the recomputed total.
const OBJECTIVE_TOL: f64 = 1e-5;

/// The chosen squad, starting lineup and armbands.
///
/// Squad and starters are ordered by position, then player id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquadSelection {
    pub squad: Vec<PlayerId>,
    pub starters: Vec<PlayerId>,
    pub captain: PlayerId,
    pub vice_captain: PlayerId,
    /// Total price of the squad.
    pub total_cost: Price,
    /// Starters' projected points with the captain counted twice.
    pub total_points: f64,
    /// Objective value reported by the solver.
    pub objective_value: f64,
}

impl SquadSelection {
    /// Reconstructs the decision from an optimal assignment and re-checks
    /// every squad invariant against it.
    ///
    /// Any inconsistency is a [`SquadError::InternalInvariant`].
    pub fn extract(
        pool: &PlayerPool,
        model: &SquadModel,
        solution: &MilpSolution,
        config: &OptimizerConfig,
    ) -> Result<Self> {
        let Some(objective_value) = solution.objective_value.filter(|_| solution.is_optimal())
        else {
            return Err(SquadError::InternalInvariant(format!(
                "cannot extract a squad from a {:?} solution",
                solution.status
            )));
        };
        if solution.values.len() != model.model.var_count() {
            return Err(SquadError::InternalInvariant(format!(
                "assignment has {} values for {} variables",
                solution.values.len(),
                model.model.var_count()
            )));
        }

        let is_set = |var: crate::milp::VarId| solution.values[var.index()] >= ROUNDING_THRESHOLD;

        let mut squad = Vec::new();
        let mut starters = Vec::new();
        let mut captains = Vec::new();
        let mut vices = Vec::new();
        for (id, v) in model.iter() {
            if is_set(v.squad) {
                squad.push(id);
            }
            if is_set(v.start) {
                starters.push(id);
            }
            if is_set(v.captain) {
                captains.push(id);
            }
            if is_set(v.vice) {
                vices.push(id);
            }
        }

        let (captain, vice_captain) = match (captains.as_slice(), vices.as_slice()) {
            ([c], [v]) => (*c, *v),
            _ => {
                return Err(SquadError::InternalInvariant(format!(
                    "expected one captain and one vice, found {} and {}",
                    captains.len(),
                    vices.len()
                )))
            }
        };

        let lookup = |id: PlayerId| {
            pool.get(id).ok_or_else(|| {
                SquadError::InternalInvariant(format!("selected player {id} is not in the pool"))
            })
        };
        let mut squad_keyed = Vec::with_capacity(squad.len());
        for id in squad {
            squad_keyed.push((lookup(id)?.position, id));
        }
        let mut starters_keyed = Vec::with_capacity(starters.len());
        for id in starters {
            starters_keyed.push((lookup(id)?.position, id));
        }
        squad_keyed.sort_unstable();
        starters_keyed.sort_unstable();
        let squad: Vec<PlayerId> = squad_keyed.into_iter().map(|(_, id)| id).collect();
        let starters: Vec<PlayerId> = starters_keyed.into_iter().map(|(_, id)| id).collect();

        let total_cost = squad
            .iter()
            .map(|&id| lookup(id).map(|p| p.price))
            .sum::<Result<Price>>()?;
        let total_points = starters
            .iter()
            .chain(std::iter::once(&captain))
            .map(|&id| lookup(id).map(|p| p.points))
            .sum::<Result<f64>>()?;

        let selection = Self {
            squad,
            starters,
            captain,
            vice_captain,
            total_cost,
            total_points,
            objective_value,
        };
        selection
            .validate(pool, config)
            .map_err(SquadError::InternalInvariant)?;
        Ok(selection)
    }

    /// Checks the selection against the squad, lineup and armband rules.
    pub fn validate(
        &self,
        pool: &PlayerPool,
        config: &OptimizerConfig,
    ) -> std::result::Result<(), String> {
        let unique: HashSet<PlayerId> = self.squad.iter().copied().collect();
        if unique.len() != self.squad.len() {
            return Err("squad contains duplicate players".into());
        }
        if self.squad.len() != config.squad_size as usize {
            return Err(format!(
                "squad has {} players, expected {}",
                self.squad.len(),
                config.squad_size
            ));
        }

        let mut positions: BTreeMap<Position, u32> = BTreeMap::new();
        let mut clubs: BTreeMap<TeamId, u32> = BTreeMap::new();
        let mut cost = 0u32;
        for &id in &self.squad {
            let p = pool
                .get(id)
                .ok_or_else(|| format!("squad player {id} is not in the pool"))?;
            *positions.entry(p.position).or_default() += 1;
            *clubs.entry(p.team_id).or_default() += 1;
            cost += p.price.tenths();
        }
        for position in Position::ALL {
            let have = positions.get(&position).copied().unwrap_or(0);
            let want = config.quota.get(position);
            if have != want {
                return Err(format!("squad has {have} {position}, expected {want}"));
            }
        }
        if let Some((team, n)) = clubs.iter().find(|&(_, &n)| n > config.club_cap) {
            return Err(format!(
                "squad has {n} players from club {team}, cap is {}",
                config.club_cap
            ));
        }
        if cost > config.budget.tenths() || cost != self.total_cost.tenths() {
            return Err(format!(
                "squad cost {} (reported {}) against budget {}",
                Price::from_tenths(cost),
                self.total_cost,
                config.budget
            ));
        }

        let starters: HashSet<PlayerId> = self.starters.iter().copied().collect();
        if starters.len() != self.starters.len() {
            return Err("starting lineup contains duplicate players".into());
        }
        if !starters.is_subset(&unique) {
            return Err("starting lineup contains players outside the squad".into());
        }
        let f = &config.formation;
        if self.starters.len() != f.starters as usize {
            return Err(format!(
                "starting lineup has {} players, expected {}",
                self.starters.len(),
                f.starters
            ));
        }
        let starting_at = |position: Position| {
            self.starters
                .iter()
                .filter_map(|&id| pool.get(id))
                .filter(|p| p.position == position)
                .count() as u32
        };
        if starting_at(Position::Goalkeeper) != f.goalkeepers {
            return Err(format!("lineup must start exactly {} GK", f.goalkeepers));
        }
        if starting_at(Position::Defender) < f.min_defenders {
            return Err(format!("lineup must start at least {} DEF", f.min_defenders));
        }
        if starting_at(Position::Forward) < f.min_forwards {
            return Err(format!("lineup must start at least {} FWD", f.min_forwards));
        }

        if self.captain == self.vice_captain {
            return Err("captain and vice-captain are the same player".into());
        }
        if !starters.contains(&self.captain) || !starters.contains(&self.vice_captain) {
            return Err("captain and vice-captain must both start".into());
        }

        let expected_points = self
            .starters
            .iter()
            .chain(std::iter::once(&self.captain))
            .filter_map(|&id| pool.get(id))
            .map(|p| p.points)
            .sum::<f64>();
        if (expected_points - self.total_points).abs()
            > OBJECTIVE_TOL * (1.0 + expected_points.abs())
        {
            return Err(format!(
                "reported points {} differ from lineup points {expected_points}",
                self.total_points
            ));
        }
        if (self.objective_value - self.total_points).abs()
            > OBJECTIVE_TOL * (1.0 + self.total_points.abs())
        {
            return Err(format!(
                "solver objective {} differs from lineup points {}",
                self.objective_value, self.total_points
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{SolverStatus, VarId};
    use crate::squad::PlayerRecord;

    /// 15 players, 2/5/5/3, five clubs of three; points equal the id.
    fn pool() -> PlayerPool {
        let positions = [
            Position::Goalkeeper,
            Position::Goalkeeper,
            Position::Defender,
            Position::Defender,
            Position::Defender,
            Position::Defender,
            Position::Defender,
            Position::Midfielder,
            Position::Midfielder,
            Position::Midfielder,
            Position::Midfielder,
            Position::Midfielder,
            Position::Forward,
            Position::Forward,
            Position::Forward,
        ];
        PlayerPool::from_records(positions.iter().enumerate().map(|(i, &pos)| {
            let id = i as u32 + 1;
            PlayerRecord::new(
                PlayerId(id),
                format!("p{id}"),
                TeamId(id % 5),
                pos,
                Price::from_tenths(60),
                Some(f64::from(id)),
            )
        }))
        .unwrap()
    }

    /// Everyone in the squad; starters are GK 2, DEF 5-7, MID 9-12 and
    /// FWD 13-15; captain 15, vice 14.
    fn assignment(model: &SquadModel) -> Vec<f64> {
        let mut values = vec![0.0; model.model.var_count()];
        let mut set = |var: VarId, x: f64| values[var.index()] = x;
        for (id, v) in model.iter() {
            set(v.squad, 0.9999);
            if id.0 == 2 || (5..=7).contains(&id.0) || id.0 >= 9 {
                set(v.start, 1.0 - 1e-7);
            }
            if id.0 == 15 {
                set(v.captain, 1.0);
            }
            if id.0 == 14 {
                set(v.vice, 0.51);
            }
        }
        values
    }

    fn solution(values: Vec<f64>, objective: f64) -> MilpSolution {
        MilpSolution {
            status: SolverStatus::Optimal,
            objective_value: Some(objective),
            values,
            solve_time_ms: 1,
        }
    }

    // 2 + 18 + 42 + 42 from the starters, captain 15 again
    const EXPECTED_POINTS: f64 = 119.0;

    #[test]
    fn test_extract_rounds_and_aggregates() {
        let pool = pool();
        let config = OptimizerConfig::default();
        let model = SquadModel::build(&pool, &config);
        let sol = solution(assignment(&model), EXPECTED_POINTS);

        let sel = SquadSelection::extract(&pool, &model, &sol, &config).unwrap();
        assert_eq!(sel.squad.len(), 15);
        assert_eq!(sel.starters.len(), 11);
        assert_eq!(sel.captain, PlayerId(15));
        assert_eq!(sel.vice_captain, PlayerId(14));
        assert_eq!(sel.total_cost, Price::from_tenths(900));
        assert!((sel.total_points - EXPECTED_POINTS).abs() < 1e-9);
        // ordered by position: the starting goalkeeper comes first
        assert_eq!(sel.starters[0], PlayerId(2));
    }

    #[test]
    fn test_non_optimal_solution_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default();
        let model = SquadModel::build(&pool, &config);
        let sol = MilpSolution::empty(SolverStatus::Infeasible);

        assert!(matches!(
            SquadSelection::extract(&pool, &model, &sol, &config),
            Err(SquadError::InternalInvariant(_))
        ));
    }

    #[test]
    fn test_wrong_value_count_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default();
        let model = SquadModel::build(&pool, &config);
        let sol = solution(vec![1.0; 3], EXPECTED_POINTS);

        assert!(matches!(
            SquadSelection::extract(&pool, &model, &sol, &config),
            Err(SquadError::InternalInvariant(_))
        ));
    }

    #[test]
    fn test_two_captains_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default();
        let model = SquadModel::build(&pool, &config);
        let mut values = assignment(&model);
        values[model.vars(PlayerId(13)).unwrap().captain.index()] = 1.0;

        let err = SquadSelection::extract(&pool, &model, &solution(values, 135.0), &config)
            .unwrap_err();
        assert!(matches!(err, SquadError::InternalInvariant(_)));
    }

    #[test]
    fn test_starter_outside_squad_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default();
        let model = SquadModel::build(&pool, &config);
        let mut values = assignment(&model);
        values[model.vars(PlayerId(6)).unwrap().squad.index()] = 0.2;

        let sol = solution(values, EXPECTED_POINTS);
        let err = SquadSelection::extract(&pool, &model, &sol, &config).unwrap_err();
        assert!(matches!(err, SquadError::InternalInvariant(_)));
    }

    #[test]
    fn test_over_budget_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default().with_budget(Price::from_tenths(899));
        let model = SquadModel::build(&pool, &config);
        let sol = solution(assignment(&model), EXPECTED_POINTS);

        let err = SquadSelection::extract(&pool, &model, &sol, &config).unwrap_err();
        assert!(matches!(err, SquadError::InternalInvariant(msg) if msg.contains("budget")));
    }

    #[test]
    fn test_club_cap_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default().with_club_cap(2);
        let model = SquadModel::build(&pool, &config);
        let sol = solution(assignment(&model), EXPECTED_POINTS);

        let err = SquadSelection::extract(&pool, &model, &sol, &config).unwrap_err();
        assert!(matches!(err, SquadError::InternalInvariant(msg) if msg.contains("club")));
    }

    #[test]
    fn test_objective_mismatch_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default();
        let model = SquadModel::build(&pool, &config);
        let sol = solution(assignment(&model), EXPECTED_POINTS + 3.0);

        assert!(matches!(
            SquadSelection::extract(&pool, &model, &sol, &config),
            Err(SquadError::InternalInvariant(_))
        ));
    }

    #[test]
    fn test_two_starting_goalkeepers_rejected() {
        let pool = pool();
        let config = OptimizerConfig::default();
        let model = SquadModel::build(&pool, &config);
        let mut values = assignment(&model);
        values[model.vars(PlayerId(1)).unwrap().start.index()] = 1.0;
        values[model.vars(PlayerId(6)).unwrap().start.index()] = 0.0;

        let err = SquadSelection::extract(&pool, &model, &solution(values, 117.0), &config)
            .unwrap_err();
        assert!(matches!(err, SquadError::InternalInvariant(msg) if msg.contains("GK")));
    }
}
