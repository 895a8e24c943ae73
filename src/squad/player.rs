//! Player records and the validated optimization pool.

use crate::error::{Result, SquadError};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Stable player identifier from the upstream feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Club identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    #[cfg_attr(feature = "serde", serde(rename = "GK"))]
    Goalkeeper,
    #[cfg_attr(feature = "serde", serde(rename = "DEF"))]
    Defender,
    #[cfg_attr(feature = "serde", serde(rename = "MID"))]
    Midfielder,
    #[cfg_attr(feature = "serde", serde(rename = "FWD"))]
    Forward,
}

impl Position {
    /// All positions in squad order.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Short code: `GK`, `DEF`, `MID` or `FWD`.
    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    /// Maps the feed's numeric element type (1 = GK .. 4 = FWD).
    pub fn from_element_type(element_type: u8) -> Result<Self> {
        match element_type {
            1 => Ok(Position::Goalkeeper),
            2 => Ok(Position::Defender),
            3 => Ok(Position::Midfielder),
            4 => Ok(Position::Forward),
            other => Err(SquadError::Data(format!("unknown element type: {other}"))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = SquadError;

    /// Accepts short codes (case-insensitive) or element-type digits.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_uppercase().as_str() {
            "GK" => Ok(Position::Goalkeeper),
            "DEF" => Ok(Position::Defender),
            "MID" => Ok(Position::Midfielder),
            "FWD" => Ok(Position::Forward),
            _ => match s.parse::<u8>() {
                Ok(code) => Position::from_element_type(code),
                Err(_) => Err(SquadError::Data(format!("unknown position: {s:?}"))),
            },
        }
    }
}

/// Fixed-point price in tenths of a unit (the feed's `now_cost`).
///
/// # Examples
///
/// ```
/// use fpl_squad::squad::Price;
///
/// let p = Price::from_millions(8.5).unwrap();
/// assert_eq!(p.tenths(), 85);
/// assert_eq!(p.to_string(), "8.5");
/// assert_eq!(Price::from_tenths(1000), Price::from_millions(100.0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Price(u32);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_tenths(tenths: u32) -> Self {
        Price(tenths)
    }

    /// Converts a decimal amount, rounding to the nearest tenth.
    pub fn from_millions(millions: f64) -> std::result::Result<Self, String> {
        if !millions.is_finite() || millions < 0.0 {
            return Err(format!("price must be a non-negative number, got {millions}"));
        }
        let tenths = (millions * 10.0).round();
        if tenths > u32::MAX as f64 {
            return Err(format!("price out of range: {millions}"));
        }
        Ok(Price(tenths as u32))
    }

    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<f64> for Price {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, String> {
        Price::from_millions(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> f64 {
        price.as_f64()
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        Price(iter.map(|p| p.0).sum())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// A player as supplied by the loader.
///
/// `projected_points` is absent when the projection feed has no value for
/// the chosen horizon; such records never reach the model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub display_name: String,
    pub team_id: TeamId,
    pub position: Position,
    pub price: Price,
    pub projected_points: Option<f64>,
}

impl PlayerRecord {
    pub fn new(
        id: PlayerId,
        display_name: impl Into<String>,
        team_id: TeamId,
        position: Position,
        price: Price,
        projected_points: Option<f64>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            team_id,
            position,
            price,
            projected_points,
        }
    }

    pub fn with_projected_points(mut self, points: Option<f64>) -> Self {
        self.projected_points = points;
        self
    }
}

/// A pool member with a known projection.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolPlayer {
    pub id: PlayerId,
    pub display_name: String,
    pub team_id: TeamId,
    pub position: Position,
    pub price: Price,
    pub points: f64,
}

/// The validated set of players handed to the model builder.
///
/// Built with [`PlayerPool::from_records`], which drops records without
/// projected points and rejects duplicate ids, zero prices and non-finite
/// points. Players keep their input order and are looked up by id.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<PoolPlayer>,
    index: HashMap<PlayerId, usize>,
    dropped: usize,
}

impl PlayerPool {
    pub fn from_records(records: impl IntoIterator<Item = PlayerRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut players = Vec::new();
        let mut dropped = 0usize;

        for record in records {
            if !seen.insert(record.id) {
                return Err(SquadError::Data(format!("duplicate player id: {}", record.id)));
            }
            if record.price.is_zero() {
                return Err(SquadError::Data(format!(
                    "player {} ({}) has a zero price",
                    record.id, record.display_name
                )));
            }
            let Some(points) = record.projected_points else {
                dropped += 1;
                continue;
            };
            if !points.is_finite() {
                return Err(SquadError::Data(format!(
                    "player {} ({}) has non-finite projected points",
                    record.id, record.display_name
                )));
            }
            players.push(PoolPlayer {
                id: record.id,
                display_name: record.display_name,
                team_id: record.team_id,
                position: record.position,
                price: record.price,
                points,
            });
        }

        if players.is_empty() {
            return Err(SquadError::Data(
                "player pool is empty after dropping records without projections".into(),
            ));
        }
        if dropped > 0 {
            debug!(dropped, kept = players.len(), "dropped records without projected points");
        }

        let index = players.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        Ok(Self {
            players,
            index,
            dropped,
        })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of input records dropped for lack of projected points.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolPlayer> {
        self.players.iter()
    }

    pub fn get(&self, id: PlayerId) -> Option<&PoolPlayer> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn count_by_position(&self, position: Position) -> usize {
        self.players.iter().filter(|p| p.position == position).count()
    }

    /// Distinct clubs present in the pool, in id order.
    pub fn teams(&self) -> BTreeSet<TeamId> {
        self.players.iter().map(|p| p.team_id).collect()
    }
}
