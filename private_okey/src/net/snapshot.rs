//! The `ROOM_SNAPSHOT` payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;
use crate::game::{
    constants::BASE_PILE,
    entities::{PileId, PileTable, Seat, TileId},
};

/// Room phase as reported by the server.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum RoomState {
    /// No state reported.
    #[default]
    Unknown,
    AutoStart,
    BuildPiles,
    Dice,
    DiceResult,
    Dealing,
    /// A phase this client has no reconciliation step for.
    Other(String),
}

impl RoomState {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim() {
            "" => Self::Unknown,
            "AUTO_START" => Self::AutoStart,
            "BUILD_PILES" => Self::BuildPiles,
            "DICE" => Self::Dice,
            "DICE_RESULT" => Self::DiceResult,
            "DEALING" => Self::Dealing,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Unknown => "",
            Self::AutoStart => "AUTO_START",
            Self::BuildPiles => "BUILD_PILES",
            Self::Dice => "DICE",
            Self::DiceResult => "DICE_RESULT",
            Self::Dealing => "DEALING",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            state => write!(f, "{}", state.as_wire()),
        }
    }
}

impl Serialize for RoomState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for RoomState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::string(deserializer)?
            .map(|raw| Self::from_wire(&raw))
            .unwrap_or_default())
    }
}

/// One seated player.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub seat: Option<i64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub connected: bool,
}

impl PlayerEntry {
    fn is_seated(&self) -> bool {
        self.user_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Authoritative room state pushed by the server.
///
/// Every field is optional. Absent or malformed values decode to `None` (or
/// an empty list) and the reconciliation steps that need them are skipped.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomSnapshot {
    #[serde(deserialize_with = "lenient::string")]
    pub room_id: Option<String>,
    pub state: RoomState,
    #[serde(deserialize_with = "lenient::entries")]
    pub players: Vec<PlayerEntry>,
    #[serde(deserialize_with = "lenient::pile_table")]
    pub pile_owners: Option<PileTable<i64>>,
    #[serde(deserialize_with = "lenient::pile_table")]
    pub pile_counts: Option<PileTable<i64>>,
    #[serde(deserialize_with = "lenient::int")]
    pub start_pile: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    pub indicator_pile: Option<i64>,
    /// Tiles still to be dealt; only ever decreases within one deal.
    #[serde(deserialize_with = "lenient::int")]
    pub deal_left: Option<i64>,
    /// Pile the next batch will be dealt from.
    #[serde(deserialize_with = "lenient::int")]
    pub deal_cursor: Option<i64>,
    /// Seat the next batch will be dealt to.
    #[serde(deserialize_with = "lenient::int")]
    pub deal_seat_cursor: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    pub auto_start_left: Option<i64>,
    /// Identities of the local player's tiles, as disclosed so far.
    #[serde(deserialize_with = "lenient::hand")]
    pub my_hand: Vec<TileId>,
}

impl RoomSnapshot {
    /// Number of seats occupied by a player with a non-empty user id.
    pub fn player_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_seated()).count()
    }

    /// Seat of `user_id`, if they're at the table on a valid seat.
    pub fn seat_of(&self, user_id: &str) -> Option<Seat> {
        if user_id.is_empty() {
            return None;
        }
        self.players
            .iter()
            .find(|p| p.user_id.as_deref() == Some(user_id))
            .and_then(|p| p.seat)
            .and_then(Seat::new)
    }

    /// Pile dealing starts from; 1 when unreported.
    pub fn start_pile(&self) -> i64 {
        self.start_pile.unwrap_or(1)
    }

    /// Piles kept in sync by count alone once the dice are thrown: the base
    /// pile, the start pile and the indicator pile when one is set.
    pub fn synced_piles(&self) -> impl Iterator<Item = PileId> + '_ {
        let indicator = self.indicator_pile.filter(|&p| p > 0);
        PileId::all().filter(move |pile| {
            let raw = i64::from(pile.get());
            raw == i64::from(BASE_PILE) || raw == self.start_pile() || Some(raw) == indicator
        })
    }

    pub fn pile_count(&self, pile: PileId) -> Option<i64> {
        self.pile_counts.as_ref().and_then(|counts| counts.get(pile))
    }
}
