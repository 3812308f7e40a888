use std::fmt;

use crate::game::constants::SEAT_COUNT;

/// The two plain projections of a snapshot shown next to the table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HudState {
    /// Seated players.
    pub players: usize,
    /// Seconds until the game auto-starts, while it's counting down.
    pub countdown: Option<i64>,
}

impl fmt::Display for HudState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "players {}/{SEAT_COUNT}", self.players)?;
        if let Some(left) = self.countdown {
            write!(f, ", starting in {left}")?;
        }
        Ok(())
    }
}
