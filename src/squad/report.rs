//! Plain-text rendering of a squad selection.

use super::extract::SquadSelection;
use super::horizon::Horizon;
use super::player::{PlayerId, PlayerPool};
use std::fmt;

/// Renders a [`SquadSelection`] against the pool it was chosen from.
///
/// ```text
/// Best squad for GW7 (15):
///  GK Raya               £5.5 pts:4.20
/// ...
/// Starting 11:
/// ...
/// Captain: Salah
/// Vice: Haaland
///
/// Total cost: £99.5m
/// Starting 11 points (with captain): 65.40
/// ```
pub struct SquadReport<'a> {
    pool: &'a PlayerPool,
    selection: &'a SquadSelection,
    horizon: Option<Horizon>,
}

impl<'a> SquadReport<'a> {
    pub fn new(pool: &'a PlayerPool, selection: &'a SquadSelection) -> Self {
        Self {
            pool,
            selection,
            horizon: None,
        }
    }

    /// Names the horizon in the heading.
    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = Some(horizon);
        self
    }

    fn name(&self, id: PlayerId) -> String {
        self.pool
            .get(id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    fn write_players(&self, f: &mut fmt::Formatter<'_>, ids: &[PlayerId]) -> fmt::Result {
        for &id in ids {
            match self.pool.get(id) {
                Some(p) => writeln!(
                    f,
                    "{:>3} {:<18} £{} pts:{:.2}",
                    p.position.code(),
                    p.display_name,
                    p.price,
                    p.points
                )?,
                None => writeln!(f, "  ? #{id}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for SquadReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sel = self.selection;
        match self.horizon {
            Some(h) => writeln!(f, "Best squad for {h} ({}):", sel.squad.len())?,
            None => writeln!(f, "Best squad ({}):", sel.squad.len())?,
        }
        self.write_players(f, &sel.squad)?;

        writeln!(f)?;
        writeln!(f, "Starting {}:", sel.starters.len())?;
        self.write_players(f, &sel.starters)?;

        writeln!(f)?;
        writeln!(f, "Captain: {}", self.name(sel.captain))?;
        writeln!(f, "Vice: {}", self.name(sel.vice_captain))?;

        writeln!(f)?;
        writeln!(f, "Total cost: £{}m", sel.total_cost)?;
        write!(
            f,
            "Starting {} points (with captain): {:.2}",
            sel.starters.len(),
            sel.total_points
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squad::{PlayerRecord, Position, Price, TeamId};

    fn pool() -> PlayerPool {
        PlayerPool::from_records(vec![
            PlayerRecord::new(
                PlayerId(1),
                "Raya",
                TeamId(1),
                Position::Goalkeeper,
                Price::from_tenths(55),
                Some(4.2),
            ),
            PlayerRecord::new(
                PlayerId(2),
                "Salah",
                TeamId(2),
                Position::Midfielder,
                Price::from_tenths(130),
                Some(8.0),
            ),
        ])
        .unwrap()
    }

    fn selection() -> SquadSelection {
        SquadSelection {
            squad: vec![PlayerId(1), PlayerId(2)],
            starters: vec![PlayerId(1), PlayerId(2)],
            captain: PlayerId(2),
            vice_captain: PlayerId(1),
            total_cost: Price::from_tenths(185),
            total_points: 20.2,
            objective_value: 20.2,
        }
    }

    #[test]
    fn test_report_layout() {
        let pool = pool();
        let sel = selection();
        let text = SquadReport::new(&pool, &sel)
            .with_horizon(Horizon::single(7))
            .to_string();

        assert!(text.starts_with("Best squad for GW7 (2):\n"));
        assert!(text.contains(" GK Raya               £5.5 pts:4.20\n"));
        assert!(text.contains("MID Salah              £13.0 pts:8.00\n"));
        assert!(text.contains("Captain: Salah\nVice: Raya\n"));
        assert!(text.contains("Total cost: £18.5m\n"));
        assert!(text.ends_with("Starting 2 points (with captain): 20.20"));
    }

    #[test]
    fn test_report_without_horizon() {
        let pool = pool();
        let sel = selection();
        let text = SquadReport::new(&pool, &sel).to_string();
        assert!(text.starts_with("Best squad (2):\n"));
    }
}
