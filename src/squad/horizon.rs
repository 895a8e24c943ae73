//! Scoring horizons: which projected-points value each player carries.
//!
//! The builder only ever reads `PlayerRecord::projected_points`. A
//! [`Horizon`] decides what goes in there, either a single period's
//! projection or the sum over the next N periods, so the single- and
//! multi-period optimizations share one model.

use super::player::{PlayerId, PlayerRecord};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A run of consecutive scoring periods (gameweeks).
///
/// # Examples
///
/// ```
/// use fpl_squad::squad::{Horizon, PlayerId, ProjectionTable};
///
/// let mut table = ProjectionTable::new();
/// for (gw, pts) in [(7, 5.0), (8, 3.5), (9, 6.0)] {
///     table.insert(PlayerId(1), gw, pts);
/// }
///
/// assert_eq!(Horizon::single(8).projected_points(&table, PlayerId(1)), Some(3.5));
/// assert_eq!(Horizon::next(7, 3).projected_points(&table, PlayerId(1)), Some(14.5));
/// assert_eq!(Horizon::next(8, 3).projected_points(&table, PlayerId(1)), None);
/// assert_eq!(Horizon::next(7, 3).to_string(), "GW7-GW9");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horizon {
    first: u32,
    periods: u32,
}

impl Horizon {
    /// One period.
    pub fn single(period: u32) -> Self {
        Self {
            first: period,
            periods: 1,
        }
    }

    /// `periods` consecutive periods starting at `first`. Zero is treated as one.
    pub fn next(first: u32, periods: u32) -> Self {
        Self {
            first,
            periods: periods.max(1),
        }
    }

    pub fn first(&self) -> u32 {
        self.first
    }

    pub fn last(&self) -> u32 {
        self.first + self.periods - 1
    }

    pub fn len(&self) -> u32 {
        self.periods
    }

    pub fn is_single(&self) -> bool {
        self.periods == 1
    }

    pub fn periods(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last()
    }

    /// Sum of the player's projections over the horizon.
    ///
    /// `None` if any period in the horizon has no projection.
    pub fn projected_points(&self, table: &ProjectionTable, id: PlayerId) -> Option<f64> {
        self.periods()
            .map(|gw| table.get(id, gw))
            .sum::<Option<f64>>()
    }

    /// Replaces each record's `projected_points` with this horizon's value.
    pub fn apply(
        &self,
        records: impl IntoIterator<Item = PlayerRecord>,
        table: &ProjectionTable,
    ) -> Vec<PlayerRecord> {
        records
            .into_iter()
            .map(|r| {
                let points = self.projected_points(table, r.id);
                r.with_projected_points(points)
            })
            .collect()
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "GW{}", self.first)
        } else {
            write!(f, "GW{}-GW{}", self.first, self.last())
        }
    }
}

/// Per-player, per-period projected points.
#[derive(Debug, Clone, Default)]
pub struct ProjectionTable {
    points: HashMap<PlayerId, BTreeMap<u32, f64>>,
}

impl ProjectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projection for one player and period, replacing any previous value.
    pub fn insert(&mut self, id: PlayerId, period: u32, points: f64) {
        self.points.entry(id).or_default().insert(period, points);
    }

    pub fn get(&self, id: PlayerId, period: u32) -> Option<f64> {
        self.points.get(&id)?.get(&period).copied()
    }

    /// Number of players with at least one projection.
    pub fn player_count(&self) -> usize {
        self.points.len()
    }
}

/// Lowest period id that is not finished yet.
///
/// Takes `(period_id, finished)` pairs in any order.
pub fn next_open_period(periods: impl IntoIterator<Item = (u32, bool)>) -> Option<u32> {
    periods
        .into_iter()
        .filter(|&(_, finished)| !finished)
        .map(|(id, _)| id)
        .min()
}
