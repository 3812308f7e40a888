//! Arrival/disclosure race tests.
//!
//! A tile dealt to the local player can land before the server discloses
//! its identity, or after. Whatever the interleaving, the rack must end up
//! with identities assigned in arrival order and nothing dropped.

use private_okey::{EngineConfig, FaceKey, Reconciler, Seat, TileId, net::RoomSnapshot};
use serde_json::{Value, json};
use std::time::Duration;

fn snapshot(mut payload: Value) -> RoomSnapshot {
    payload["players"] = json!({
        "1": {"userId": "alice", "seat": 1},
        "2": {"userId": "bob", "seat": 2},
    });
    serde_json::from_value(payload).unwrap()
}

fn hand(ids: &[&str]) -> Vec<TileId> {
    ids.iter().copied().map(TileId::new).collect()
}

/// Lays out two piles for seat 1 and arms the deal counter.
fn dealing_table(batch: usize) -> Reconciler {
    let mut r = Reconciler::with_defaults(EngineConfig::default(), "alice");
    r.apply(&snapshot(json!({
        "state": "BUILD_PILES",
        "pileOwners": {"1": 1, "2": 1},
        "pileCounts": {"1": batch, "2": batch},
    })));
    r.apply(&snapshot(json!({
        "state": "DEALING", "dealLeft": 10, "dealCursor": 1, "dealSeatCursor": 1,
    })));
    r
}

fn rack_ids(r: &Reconciler) -> Vec<Option<TileId>> {
    r.racks()
        .tiles(Seat::new(1).unwrap())
        .iter()
        .map(|&h| r.tokens().tile(h).id().cloned())
        .collect()
}

#[test]
fn test_arrival_before_disclosure() {
    let mut r = dealing_table(3);
    r.apply(&snapshot(json!({"state": "DEALING", "dealLeft": 9})));
    r.tick(Duration::from_secs(2));
    assert_eq!(r.resolver().pending_len(), 3);

    r.apply(&snapshot(json!({
        "state": "DEALING", "dealLeft": 9, "myHand": ["B01-1", "B02-1", "B03-1"],
    })));

    assert_eq!(
        rack_ids(&r),
        vec![
            Some(TileId::new("B01-1")),
            Some(TileId::new("B02-1")),
            Some(TileId::new("B03-1")),
        ]
    );
    assert_eq!(r.resolver().pending_len(), 0);
    assert_eq!(r.resolver().early_len(), 0);
}

#[test]
fn test_disclosure_before_arrival() {
    let mut r = dealing_table(3);
    r.apply(&snapshot(json!({
        "state": "DEALING", "dealLeft": 9, "myHand": ["B01-1", "B02-1", "B03-1"],
    })));
    assert_eq!(r.resolver().early_len(), 3);
    assert!(rack_ids(&r).is_empty());

    r.tick(Duration::from_secs(2));

    assert_eq!(
        rack_ids(&r),
        vec![
            Some(TileId::new("B01-1")),
            Some(TileId::new("B02-1")),
            Some(TileId::new("B03-1")),
        ]
    );
    assert_eq!(r.resolver().early_len(), 0);
}

#[test]
fn test_partial_disclosures_interleaved_with_arrivals() {
    let mut r = dealing_table(2);

    // First batch dealt, one identity disclosed while it flies.
    r.apply(&snapshot(json!({
        "state": "DEALING", "dealLeft": 9, "dealCursor": 2, "dealSeatCursor": 1,
        "myHand": ["K05-2"],
    })));
    r.tick(Duration::from_secs(2));
    assert_eq!(r.resolver().pending_len(), 1);

    // Second batch dealt alongside the rest of the first batch's identity.
    r.apply(&snapshot(json!({
        "state": "DEALING", "dealLeft": 8,
        "myHand": ["K05-2", "G11-1"],
    })));
    assert_eq!(r.resolver().pending_len(), 0);

    r.apply(&snapshot(json!({
        "state": "DEALING", "dealLeft": 8,
        "myHand": ["K05-2", "G11-1", "JOKER-1", "K05-1"],
    })));
    assert_eq!(r.resolver().early_len(), 2);

    r.tick(Duration::from_secs(2));

    assert_eq!(
        rack_ids(&r),
        vec![
            Some(TileId::new("K05-2")),
            Some(TileId::new("G11-1")),
            Some(TileId::new("JOKER-1")),
            Some(TileId::new("K05-1")),
        ]
    );
}

#[test]
fn test_duplicate_faces_are_both_revealed() {
    let mut r = dealing_table(2);
    r.apply(&snapshot(json!({"state": "DEALING", "dealLeft": 9})));
    r.tick(Duration::from_secs(2));

    r.apply(&snapshot(json!({
        "state": "DEALING", "dealLeft": 9, "myHand": ["R07-1", "R07-2"],
    })));

    let visuals = r.visuals();
    let r07 = FaceKey::face("R07");
    assert_eq!(visuals.bound_count(&r07), 2);
    assert_eq!(visuals.idle_count(&r07), 0);
    assert_ne!(
        r.tile_by_id(&TileId::new("R07-1")),
        r.tile_by_id(&TileId::new("R07-2"))
    );
}

#[test]
fn test_unchanged_hand_discloses_nothing() {
    let mut r = dealing_table(1);
    let full = hand(&["G01-1"]);
    r.apply(&snapshot(json!({"state": "DEALING", "dealLeft": 10, "myHand": full})));
    assert_eq!(r.resolver().early_len(), 1);

    // Re-sending the same hand must not buffer the identity twice.
    r.apply(&snapshot(json!({"state": "DEALING", "dealLeft": 10, "myHand": full})));
    assert_eq!(r.resolver().early_len(), 1);
}
