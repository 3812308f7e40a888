//! The fixed-rate table loop.
//!
//! Each step drains the inbox, applies snapshots in arrival order, then
//! advances the reconciler by the elapsed time.

use private_okey::{PileId, Reconciler, Seat, net::RoomState};
use std::{fmt, time::Duration};
use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};

use crate::websocket_client::InboundEvent;

/// What one [`TableRunner::step`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Snapshots applied before ticking.
    pub applied: usize,
    /// The connection is gone and no more events will arrive.
    pub closed: bool,
}

/// A one-line picture of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub state: RoomState,
    pub visible_piles: usize,
    pub pile_tiles: usize,
    pub rack_tiles: [usize; 4],
    pub in_flight: usize,
    pub free: usize,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.rack_tiles;
        write!(
            f,
            "{} | piles {} ({} tiles) | racks {a}/{b}/{c}/{d} | in flight {} | free {}",
            self.state, self.visible_piles, self.pile_tiles, self.in_flight, self.free
        )
    }
}

pub struct TableRunner {
    reconciler: Reconciler,
    inbox: UnboundedReceiver<InboundEvent>,
    room_id: Option<String>,
    closed: bool,
}

impl TableRunner {
    pub fn new(reconciler: Reconciler, inbox: UnboundedReceiver<InboundEvent>) -> Self {
        Self {
            reconciler,
            inbox,
            room_id: None,
            closed: false,
        }
    }

    /// Handles every event queued so far, then ticks the table by `dt`.
    pub fn step(&mut self, dt: Duration) -> StepOutcome {
        let hud_before = self.reconciler.hud();
        let applied = self.drain();
        self.reconciler.tick(dt);

        let hud = self.reconciler.hud();
        if hud != hud_before {
            tracing::info!(
                players = hud.players,
                countdown = hud.countdown,
                "{hud}"
            );
        }
        if applied > 0 {
            tracing::debug!(applied, "{}", self.summary());
        }

        StepOutcome {
            applied,
            closed: self.closed,
        }
    }

    fn drain(&mut self) -> usize {
        let mut applied = 0;
        while !self.closed {
            match self.inbox.try_recv() {
                Ok(event) => {
                    if self.handle(event) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.closed = true,
            }
        }
        applied
    }

    /// Returns whether a snapshot was applied.
    fn handle(&mut self, event: InboundEvent) -> bool {
        match event {
            InboundEvent::Snapshot(snapshot) => {
                if let Some(room) = &snapshot.room_id {
                    self.room_id = Some(room.clone());
                }
                self.reconciler.apply(&snapshot);
                return true;
            }
            InboundEvent::Rooms(rooms) => {
                tracing::info!(count = rooms.len(), "Rooms");
                for room in &rooms {
                    tracing::info!("  {room}");
                }
            }
            InboundEvent::Created(room) | InboundEvent::Joined(room) => match room {
                Some(room) => {
                    tracing::info!(room = %room, "Seated");
                    self.room_id = Some(room);
                }
                None => tracing::warn!("Room reply without a room id"),
            },
            InboundEvent::Closed => self.closed = true,
        }
        false
    }

    pub fn summary(&self) -> SceneSummary {
        let r = &self.reconciler;
        let mut rack_tiles = [0; 4];
        for (slot, seat) in rack_tiles.iter_mut().zip(Seat::all()) {
            *slot = r.racks().len(seat);
        }
        SceneSummary {
            state: r.cache().state().clone(),
            visible_piles: PileId::all()
                .filter(|&p| r.piles().get(p).is_visible())
                .count(),
            pile_tiles: r.piles().total_len(),
            rack_tiles,
            in_flight: r.in_flight(),
            free: r.tokens().free_len(),
        }
    }

    /// The room most recently created, joined or seen in a snapshot.
    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }
}
