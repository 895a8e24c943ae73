//! Shared pool builders and independent checks for integration tests.

#![allow(dead_code)]

use fpl_squad::squad::{
    OptimizerConfig, PlayerId, PlayerRecord, Position, Price, SquadSelection, TeamId,
};
use std::collections::{HashMap, HashSet};

pub fn player(id: u32, team: u32, position: Position, tenths: u32, points: f64) -> PlayerRecord {
    PlayerRecord::new(
        PlayerId(id),
        format!("player {id}"),
        TeamId(team),
        position,
        Price::from_tenths(tenths),
        Some(points),
    )
}

/// Positions for a pool with `gk`, `def`, `mid`, `fwd` players, in that order.
pub fn layout(gk: usize, def: usize, mid: usize, fwd: usize) -> Vec<Position> {
    let mut out = Vec::with_capacity(gk + def + mid + fwd);
    out.extend(std::iter::repeat(Position::Goalkeeper).take(gk));
    out.extend(std::iter::repeat(Position::Defender).take(def));
    out.extend(std::iter::repeat(Position::Midfielder).take(mid));
    out.extend(std::iter::repeat(Position::Forward).take(fwd));
    out
}

/// Checks every squad rule directly against the input records.
pub fn assert_valid(records: &[PlayerRecord], sel: &SquadSelection, config: &OptimizerConfig) {
    let by_id: HashMap<PlayerId, &PlayerRecord> = records.iter().map(|r| (r.id, r)).collect();

    let squad: HashSet<PlayerId> = sel.squad.iter().copied().collect();
    assert_eq!(squad.len(), 15, "squad must have 15 unique players");
    assert_eq!(sel.squad.len(), 15);

    let count = |ids: &[PlayerId], pos: Position| {
        ids.iter().filter(|id| by_id[*id].position == pos).count()
    };
    assert_eq!(count(&sel.squad, Position::Goalkeeper), 2);
    assert_eq!(count(&sel.squad, Position::Defender), 5);
    assert_eq!(count(&sel.squad, Position::Midfielder), 5);
    assert_eq!(count(&sel.squad, Position::Forward), 3);

    let mut clubs: HashMap<TeamId, u32> = HashMap::new();
    for id in &sel.squad {
        *clubs.entry(by_id[id].team_id).or_default() += 1;
    }
    assert!(clubs.values().all(|&n| n <= config.club_cap), "club cap broken: {clubs:?}");

    let cost: u32 = sel.squad.iter().map(|id| by_id[id].price.tenths()).sum();
    assert!(cost <= config.budget.tenths(), "cost {cost} over budget");
    assert_eq!(cost, sel.total_cost.tenths());

    let starters: HashSet<PlayerId> = sel.starters.iter().copied().collect();
    assert_eq!(starters.len(), 11);
    assert!(starters.is_subset(&squad));
    assert_eq!(count(&sel.starters, Position::Goalkeeper), 1);
    assert!(count(&sel.starters, Position::Defender) >= 3);
    assert!(count(&sel.starters, Position::Forward) >= 1);

    assert_ne!(sel.captain, sel.vice_captain);
    assert!(starters.contains(&sel.captain));
    assert!(starters.contains(&sel.vice_captain));

    let points = |id: &PlayerId| by_id[id].projected_points.unwrap_or(0.0);
    let expected: f64 = sel.starters.iter().map(points).sum::<f64>() + points(&sel.captain);
    assert!((sel.total_points - expected).abs() < 1e-6);
}

/// Best achievable starting-XI points (captain doubled) for a fixed squad,
/// by enumerating which three outfielders sit on the bench.
pub fn best_lineup_points(records: &[PlayerRecord], squad: &[PlayerId]) -> f64 {
    let by_id: HashMap<PlayerId, &PlayerRecord> = records.iter().map(|r| (r.id, r)).collect();
    let pts = |r: &PlayerRecord| r.projected_points.unwrap_or(0.0);

    let keeper = squad
        .iter()
        .map(|id| by_id[id])
        .filter(|r| r.position == Position::Goalkeeper)
        .map(pts)
        .fold(f64::NEG_INFINITY, f64::max);
    let outfield: Vec<&PlayerRecord> = squad
        .iter()
        .map(|id| by_id[id])
        .filter(|r| r.position != Position::Goalkeeper)
        .collect();
    assert_eq!(outfield.len(), 13);

    let mut best = f64::NEG_INFINITY;
    for a in 0..13 {
        for b in a + 1..13 {
            for c in b + 1..13 {
                let starting: Vec<&PlayerRecord> = outfield
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != a && *i != b && *i != c)
                    .map(|(_, r)| *r)
                    .collect();
                let defs = starting.iter().filter(|r| r.position == Position::Defender).count();
                let fwds = starting.iter().filter(|r| r.position == Position::Forward).count();
                if defs < 3 || fwds < 1 {
                    continue;
                }
                let sum: f64 = starting.iter().map(|r| pts(r)).sum::<f64>() + keeper;
                let captain = starting.iter().map(|r| pts(r)).fold(keeper, f64::max);
                best = best.max(sum + captain);
            }
        }
    }
    best
}
