use crate::{
    game::entities::{PileId, PileTable, TileId},
    net::{RoomSnapshot, RoomState},
};

/// The fields of the previous snapshot that the next one is diffed against.
#[derive(Debug)]
pub struct SnapshotCache {
    valid: bool,
    deal_left: i64,
    deal_cursor: i64,
    deal_seat_cursor: i64,
    pile_counts: PileTable<i64>,
    hand: Vec<TileId>,
    state: RoomState,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self {
            valid: false,
            deal_left: -1,
            deal_cursor: 0,
            deal_seat_cursor: 0,
            pile_counts: PileTable::default(),
            hand: Vec::new(),
            state: RoomState::Unknown,
        }
    }
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `snapshot` as the baseline for the next diff.
    ///
    /// Pile counts are only replaced when the snapshot carries a count map;
    /// piles missing from a present map are recorded as zero.
    pub fn store(&mut self, snapshot: &RoomSnapshot) {
        self.deal_left = snapshot.deal_left.unwrap_or(-1);
        self.deal_cursor = snapshot.deal_cursor.unwrap_or(0);
        self.deal_seat_cursor = snapshot.deal_seat_cursor.unwrap_or(0);

        if let Some(counts) = &snapshot.pile_counts {
            self.pile_counts = PileId::all()
                .map(|pile| (pile, counts.get(pile).unwrap_or(0)))
                .collect();
        }

        self.hand.clone_from(&snapshot.my_hand);
        self.valid = true;
    }

    /// Forgets the deal counter so the next snapshot can't read as a tick.
    /// The last hand and pile counts are kept.
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.deal_left = -1;
    }

    /// Records the room state, returning the previous one if it changed.
    pub fn observe_state(&mut self, state: &RoomState) -> Option<RoomState> {
        (self.state != *state).then(|| std::mem::replace(&mut self.state, state.clone()))
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn deal_left(&self) -> i64 {
        self.deal_left
    }

    /// `(pile, seat)` the previous snapshot said the next batch would use.
    pub fn deal_cursor(&self) -> (i64, i64) {
        (self.deal_cursor, self.deal_seat_cursor)
    }

    pub fn pile_count(&self, pile: PileId) -> Option<i64> {
        self.pile_counts.get(pile)
    }

    pub fn hand(&self) -> &[TileId] {
        &self.hand
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> RoomSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_store_defaults() {
        let mut cache = SnapshotCache::new();
        cache.store(&snapshot(json!({})));
        assert!(cache.is_valid());
        assert_eq!(cache.deal_left(), -1);
        assert_eq!(cache.deal_cursor(), (0, 0));
        assert_eq!(cache.pile_count(PileId::new(1).unwrap()), None);
    }

    #[test]
    fn test_counts_survive_snapshots_without_a_map() {
        let mut cache = SnapshotCache::new();
        let three = PileId::new(3).unwrap();
        cache.store(&snapshot(json!({"pileCounts": {"3": 8}})));
        cache.store(&snapshot(json!({"dealLeft": 4})));

        assert_eq!(cache.pile_count(three), Some(8));
        assert_eq!(cache.pile_count(PileId::new(4).unwrap()), Some(0));
    }

    #[test]
    fn test_invalidate_keeps_hand() {
        let mut cache = SnapshotCache::new();
        cache.store(&snapshot(json!({"dealLeft": 9, "myHand": ["R01-1"]})));
        cache.invalidate();

        assert!(!cache.is_valid());
        assert_eq!(cache.deal_left(), -1);
        assert_eq!(cache.hand(), &[TileId::new("R01-1")]);
    }

    #[test]
    fn test_observe_state_reports_changes_only() {
        let mut cache = SnapshotCache::new();
        assert_eq!(cache.observe_state(&RoomState::Dealing), Some(RoomState::Unknown));
        assert_eq!(cache.observe_state(&RoomState::Dealing), None);
        assert_eq!(cache.state(), &RoomState::Dealing);
    }
}
