//! Deal Replay Example
//!
//! Feeds a scripted sequence of server frames through a reconciler and
//! prints the table after each one.

use private_okey::{EngineConfig, PileId, Reconciler, Seat, net::ServerMessage};
use serde_json::{Value, json};
use std::time::Duration;

fn frame(payload: Value) -> String {
    let mut payload = payload;
    payload["players"] = json!({
        "1": {"userId": "alice", "seat": 1},
        "2": {"userId": "bob", "seat": 2},
        "3": {"userId": "carol", "seat": 3},
        "4": {"userId": "dave", "seat": 4},
    });
    json!({"t": "ROOM_SNAPSHOT", "p": payload}).to_string()
}

fn print_table(r: &Reconciler) {
    let piles: Vec<String> = PileId::all()
        .filter(|&p| r.piles().get(p).is_visible())
        .map(|p| format!("{}:{}", p.get(), r.piles().len(p)))
        .collect();
    let racks: Vec<String> = Seat::all()
        .map(|s| format!("{s}={}", r.racks().len(s)))
        .collect();
    println!("  {} | piles [{}]", r.hud(), piles.join(" "));
    println!(
        "  racks [{}] | in flight {} | pending {} | early {}",
        racks.join(", "),
        r.in_flight(),
        r.resolver().pending_len(),
        r.resolver().early_len()
    );
}

fn main() {
    println!("=== Okey Deal Replay ===\n");

    let mut reconciler = Reconciler::with_defaults(EngineConfig::default(), "alice");

    let script = [
        frame(json!({"state": "AUTO_START", "autoStartLeft": 3})),
        frame(json!({
            "state": "BUILD_PILES",
            "startPile": 1,
            "pileOwners": {"1": 1, "2": 2, "3": 3, "4": 4, "5": 1},
            "pileCounts": {"1": 8, "2": 7, "3": 7, "4": 7, "5": 7},
        })),
        frame(json!({"state": "DEALING", "dealLeft": 5, "dealCursor": 1, "dealSeatCursor": 1})),
        frame(json!({
            "state": "DEALING", "dealLeft": 4, "dealCursor": 2, "dealSeatCursor": 2,
            "myHand": ["R01-1", "R02-1", "G13-2"],
        })),
        frame(json!({
            "state": "DEALING", "dealLeft": 3, "dealCursor": 3, "dealSeatCursor": 3,
            "myHand": ["R01-1", "R02-1", "G13-2", "JOKER-1", "B07-1", "B07-2", "K11-1", "K12-1"],
        })),
    ];

    for text in &script {
        match ServerMessage::parse(text) {
            Ok(ServerMessage::RoomSnapshot(snapshot)) => {
                println!("-> {}", snapshot.state);
                reconciler.apply(&snapshot);
            }
            Ok(other) => println!("-> ignored {other}"),
            Err(e) => println!("-> bad frame: {e}"),
        }
        print_table(&reconciler);

        // Half a second of frames between snapshots.
        for _ in 0..30 {
            reconciler.tick(Duration::from_millis(16));
        }
    }

    // Let the last flight land.
    reconciler.tick(Duration::from_secs(1));
    println!("-> settled");
    print_table(&reconciler);
}
