use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{COLORS, COPY_SEPARATOR, JOKER_CODE, MAX_RANK, PILE_COUNT, SEAT_COUNT};

/// A draw pile identifier in `1..=PILE_COUNT`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PileId(u8);

impl PileId {
    /// Validates a raw server value. Anything outside `1..=PILE_COUNT` is
    /// treated as unset.
    pub fn new(raw: i64) -> Option<Self> {
        (1..=PILE_COUNT as i64)
            .contains(&raw)
            .then_some(Self(raw as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    /// Every pile id in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=PILE_COUNT as u8).map(Self)
    }

    /// Pile ids in dealing order: `start` through the last pile, then
    /// wrapping back to the first. An invalid start falls back to pile 1.
    pub fn deal_order(start: i64) -> Vec<Self> {
        let start = Self::new(start).map_or(0, Self::index);
        (0..PILE_COUNT)
            .map(|i| Self(((start + i) % PILE_COUNT) as u8 + 1))
            .collect()
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pile {}", self.0)
    }
}

/// A seat at the table in `1..=SEAT_COUNT`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Seat(u8);

impl Seat {
    pub fn new(raw: i64) -> Option<Self> {
        (1..=SEAT_COUNT as i64)
            .contains(&raw)
            .then_some(Self(raw as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (1..=SEAT_COUNT as u8).map(Self)
    }

    /// The seat that plays after this one.
    pub fn next(self) -> Self {
        if usize::from(self.0) == SEAT_COUNT {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }

    /// How many seats clockwise `other` sits from `self`.
    pub fn distance_to(self, other: Self) -> usize {
        (usize::from(other.0) + SEAT_COUNT - usize::from(self.0)) % SEAT_COUNT
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// A server-assigned tile identity such as `R01-2` or `JOKER-1`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TileId(String);

impl TileId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The face code with the copy discriminator stripped:
    /// `B05-2` becomes `B05`, `JOKER-1` becomes `JOKER`.
    pub fn face_code(&self) -> &str {
        match self.0.find(COPY_SEPARATOR) {
            Some(dash) if dash > 0 => &self.0[..dash],
            _ => &self.0,
        }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TileId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Key of a visual stack in the visual pool.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum FaceKey {
    /// The face-down tile back.
    Back,
    /// A revealed face, keyed by its face code.
    Face(String),
}

impl FaceKey {
    pub fn face(code: &str) -> Self {
        Self::Face(code.to_string())
    }

    pub fn joker() -> Self {
        Self::face(JOKER_CODE)
    }

    /// Every coloured face code, `B01` through `K13`.
    pub fn colored_codes() -> impl Iterator<Item = String> {
        COLORS.into_iter().flat_map(|color| {
            (1..=MAX_RANK).map(move |rank| format!("{color}{rank:02}"))
        })
    }
}

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Back => write!(f, "back"),
            Self::Face(code) => write!(f, "{code}"),
        }
    }
}

/// A fixed-size table with one optional slot per pile id.
///
/// Replaces string-keyed maps on the reconciliation path; a `None` slot is
/// an unset value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PileTable<T: Copy>([Option<T>; PILE_COUNT]);

impl<T: Copy> Default for PileTable<T> {
    fn default() -> Self {
        Self([None; PILE_COUNT])
    }
}

impl<T: Copy> PileTable<T> {
    pub fn get(&self, pile: PileId) -> Option<T> {
        self.0[pile.index()]
    }

    pub fn set(&mut self, pile: PileId, value: T) {
        self.0[pile.index()] = Some(value);
    }

    pub fn unset(&mut self, pile: PileId) {
        self.0[pile.index()] = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = (PileId, Option<T>)> + '_ {
        PileId::all().map(|pile| (pile, self.get(pile)))
    }
}

impl<T: Copy> FromIterator<(PileId, T)> for PileTable<T> {
    fn from_iter<I: IntoIterator<Item = (PileId, T)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (pile, value) in iter {
            table.set(pile, value);
        }
        table
    }
}
