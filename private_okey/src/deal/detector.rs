use std::fmt;

use crate::{
    game::entities::{PileId, Seat},
    net::RoomSnapshot,
    reconcile::SnapshotCache,
};

/// One batch dealt from a pile to a seat.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DealTick {
    pub pile: PileId,
    pub seat: Seat,
    /// Tiles expected in the batch.
    pub count: usize,
}

impl fmt::Display for DealTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({} tiles)", self.pile, self.seat, self.count)
    }
}

/// Compares `snapshot` with the previous one and reports the batch dealt in
/// between, if any.
///
/// A batch was dealt when the remaining-deal counter dropped. The source
/// pile and target seat come from the cached cursor, since the new cursor
/// already points at the next batch. The batch size is the cached count of
/// the source pile, or `fallback` when that count is unknown or not
/// positive. At most one batch is reported per snapshot.
pub fn detect(cache: &SnapshotCache, snapshot: &RoomSnapshot, fallback: usize) -> Option<DealTick> {
    if !cache.is_valid() {
        return None;
    }

    let left = snapshot.deal_left.filter(|&n| n >= 0)?;
    let last = cache.deal_left();
    if left >= last {
        return None;
    }
    if last - left > 1 {
        log::debug!("deal counter dropped {last} -> {left}; only the last batch is animated");
    }

    let (raw_pile, raw_seat) = cache.deal_cursor();
    let (Some(pile), Some(seat)) = (PileId::new(raw_pile), Seat::new(raw_seat)) else {
        log::warn!("deal tick ignored: cursor (pile {raw_pile}, seat {raw_seat}) out of range");
        return None;
    };

    let count = cache
        .pile_count(pile)
        .filter(|&c| c > 0)
        .map_or(fallback, |c| c as usize);

    Some(DealTick { pile, seat, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> RoomSnapshot {
        serde_json::from_value(value).unwrap()
    }

    fn cached(value: serde_json::Value) -> SnapshotCache {
        let mut cache = SnapshotCache::new();
        cache.store(&snapshot(value));
        cache
    }

    #[test]
    fn test_no_tick_without_cache() {
        let cache = SnapshotCache::new();
        assert_eq!(detect(&cache, &snapshot(json!({"dealLeft": 3})), 7), None);
    }

    #[test]
    fn test_decrement_uses_cached_cursor() {
        let cache = cached(json!({
            "dealLeft": 15, "dealCursor": 3, "dealSeatCursor": 2,
            "pileCounts": {"3": 8},
        }));
        let next = snapshot(json!({"dealLeft": 14, "dealCursor": 4, "dealSeatCursor": 3}));

        let tick = detect(&cache, &next, 7).unwrap();
        assert_eq!(tick.pile, PileId::new(3).unwrap());
        assert_eq!(tick.seat, Seat::new(2).unwrap());
        assert_eq!(tick.count, 8);
    }

    #[test]
    fn test_unknown_count_falls_back() {
        let cache = cached(json!({
            "dealLeft": 5, "dealCursor": 9, "dealSeatCursor": 1,
            "pileCounts": {"9": 0},
        }));
        let tick = detect(&cache, &snapshot(json!({"dealLeft": 4})), 7).unwrap();
        assert_eq!(tick.count, 7);
    }

    #[test]
    fn test_no_tick_when_counter_holds_or_is_missing() {
        let cache = cached(json!({"dealLeft": 5, "dealCursor": 1, "dealSeatCursor": 1}));
        assert_eq!(detect(&cache, &snapshot(json!({"dealLeft": 5})), 7), None);
        assert_eq!(detect(&cache, &snapshot(json!({"dealLeft": 6})), 7), None);
        assert_eq!(detect(&cache, &snapshot(json!({})), 7), None);
        assert_eq!(detect(&cache, &snapshot(json!({"dealLeft": -1})), 7), None);
    }

    #[test]
    fn test_collapsed_decrements_yield_one_tick() {
        let cache = cached(json!({"dealLeft": 10, "dealCursor": 2, "dealSeatCursor": 4}));
        let tick = detect(&cache, &snapshot(json!({"dealLeft": 7})), 7).unwrap();
        assert_eq!(tick.pile, PileId::new(2).unwrap());
    }

    #[test]
    fn test_out_of_range_cursor_is_ignored() {
        let cache = cached(json!({"dealLeft": 10, "dealCursor": 0, "dealSeatCursor": 2}));
        assert_eq!(detect(&cache, &snapshot(json!({"dealLeft": 9})), 7), None);
    }
}
