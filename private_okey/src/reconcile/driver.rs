//! The per-snapshot reconciliation driver.

use glam::{Quat, Vec3};
use std::time::Duration;

use super::{SnapshotCache, TableParts, hud::HudState};
use crate::{
    config::EngineConfig,
    deal::{self, Flight},
    game::{
        constants::SEAT_COUNT,
        entities::{PileId, Seat, TileId},
    },
    identity::{IdentityResolver, multiset_difference},
    net::{RoomSnapshot, RoomState},
    pool::{BundlePool, Parent, Placement, TileHandle, TokenPool, VisualPool},
    table::{PileRegistry, RackRegistry, Transform, ViewSlot},
};

/// Reconciles server snapshots into the table's pools and registries.
///
/// All mutation happens through [`Reconciler::apply`] (once per snapshot)
/// and [`Reconciler::tick`] (once per frame), both called from the same
/// thread.
#[derive(Debug)]
pub struct Reconciler {
    /// Sizing, spacing and timing
    config: EngineConfig,

    /// User id the local seat is looked up by
    local_user: String,

    /// Pools and registries
    parts: TableParts,

    /// Pending tiles and early identities of the local rack
    resolver: IdentityResolver,

    /// Previous snapshot, for deal-tick and hand diffs
    cache: SnapshotCache,

    /// Batches currently in the air
    flights: Vec<Flight>,

    /// Player count and countdown
    hud: HudState,

    /// Local seat as of the last snapshot that placed us
    local_seat: Option<Seat>,
}

impl Reconciler {
    pub fn new(config: EngineConfig, local_user: impl Into<String>, parts: TableParts) -> Self {
        Self {
            config,
            local_user: local_user.into(),
            parts,
            resolver: IdentityResolver::new(),
            cache: SnapshotCache::new(),
            flights: Vec::new(),
            hud: HudState::default(),
            local_seat: None,
        }
    }

    /// Builds a reconciler over freshly warmed-up pools.
    pub fn with_defaults(config: EngineConfig, local_user: impl Into<String>) -> Self {
        let parts = TableParts::warm_up(&config);
        Self::new(config, local_user, parts)
    }

    /// Applies one snapshot.
    ///
    /// Order matters: the deal tick is detected against the piles as they
    /// were before this snapshot re-lays them, and identities are resolved
    /// after any tiles have been taken.
    pub fn apply(&mut self, snapshot: &RoomSnapshot) {
        self.hud.players = snapshot.player_count();
        let seat = snapshot.seat_of(&self.local_user);
        if seat.is_some() {
            self.local_seat = seat;
        }

        if let Some(previous) = self.cache.observe_state(&snapshot.state) {
            log::info!("room state {previous} -> {}", snapshot.state);
            if snapshot.state == RoomState::Dealing {
                self.reset_for_deal();
            }
        }

        self.hud.countdown = (snapshot.state == RoomState::AutoStart)
            .then(|| snapshot.auto_start_left.unwrap_or(0));

        match snapshot.state {
            RoomState::Dealing => self.handle_deal_tick(snapshot, seat),
            RoomState::BuildPiles => self.render_build_piles(snapshot, seat),
            RoomState::DiceResult => {
                self.sync_piles_from_counts(snapshot);
                self.render_build_piles(snapshot, seat);
            }
            _ => {}
        }

        self.resolve_identities(snapshot);
        self.cache.store(snapshot);
    }

    /// Advances every flight by `dt` and lands the ones that arrived.
    pub fn tick(&mut self, dt: Duration) {
        for flight in &mut self.flights {
            let position = flight.advance(dt);
            self.parts.bundles.set_position(flight.bundle(), position);
        }

        let (arrived, flying): (Vec<Flight>, Vec<Flight>) = std::mem::take(&mut self.flights)
            .into_iter()
            .partition(Flight::is_arrived);
        self.flights = flying;

        for flight in arrived {
            self.land(flight);
        }
    }

    /// Clears everything a previous hand left behind.
    fn reset_for_deal(&mut self) {
        let TableParts {
            tokens,
            visuals,
            bundles,
            racks,
            ..
        } = &mut self.parts;

        let mut reclaimed = 0;
        for flight in self.flights.drain(..) {
            let (bundle, tiles) = flight.into_cargo();
            for handle in tiles {
                tokens.release(handle, visuals);
                reclaimed += 1;
            }
            bundles.give_back(bundle, tokens);
        }

        let drained = racks.drain_all(tokens, visuals);
        self.resolver.clear();
        self.cache.invalidate();

        log::debug!("deal reset: {drained} rack tile(s) and {reclaimed} in-flight tile(s) freed");
    }

    fn handle_deal_tick(&mut self, snapshot: &RoomSnapshot, local: Option<Seat>) {
        let Some(tick) = deal::detect(&self.cache, snapshot, self.config.fallback_batch) else {
            return;
        };

        let TableParts {
            tokens,
            visuals,
            bundles,
            piles,
            ..
        } = &mut self.parts;

        let moved = piles.take(tick.pile, tick.count, tokens);
        if moved.is_empty() {
            log::warn!("deal tick {tick}: pile is empty");
            return;
        }
        log::info!("deal tick {tick}: {} tile(s) moving", moved.len());

        let Some(local) = local else {
            log::warn!("deal tick {tick}: local seat unknown, returning tiles to the pool");
            for handle in moved {
                tokens.release(handle, visuals);
            }
            return;
        };

        let layout = &self.config.layout;
        let from = piles.world_transform(tick.pile, layout).unwrap_or_else(|| {
            Transform::new(layout.pile_area(ViewSlot::Main).position, Quat::IDENTITY)
        });
        let to = layout.rack(ViewSlot::relative(local, tick.seat)).position;

        let bundle = bundles.borrow();
        bundles.set_transform(bundle, from.position, from.rotation);
        for (i, &handle) in moved.iter().enumerate() {
            tokens.set_back(handle, visuals);
            let offset = Vec3::new(0.0, 0.0, i as f32 * self.config.tile_y_step);
            tokens.place(handle, Parent::Bundle(bundle), offset);
            bundles.attach(bundle, handle);
        }

        let mut flight = Flight::new(
            bundle,
            moved,
            tick.seat,
            tick.seat == local,
            from,
            to,
            self.config.flight_duration(),
        );
        flight.launch();
        self.flights.push(flight);
    }

    fn land(&mut self, flight: Flight) {
        let TableParts {
            tokens,
            visuals,
            bundles,
            racks,
            ..
        } = &mut self.parts;

        let seat = flight.seat();
        let to_local = flight.is_to_local();
        bundles.set_transform(flight.bundle(), flight.destination(), Quat::IDENTITY);

        let (bundle, tiles) = flight.into_cargo();
        for handle in tiles {
            racks.append(seat, handle, tokens);
            if to_local {
                self.resolver.push_pending(handle);
            }
        }

        if to_local {
            self.resolver.flush(tokens, visuals);
        }
        bundles.give_back(bundle, tokens);
        log::debug!("batch landed on {seat}, rack now {}", racks.len(seat));
    }

    /// Lays out every pile in dealing order under its owner's area.
    fn render_build_piles(&mut self, snapshot: &RoomSnapshot, local: Option<Seat>) {
        let Some(local) = local else {
            log::debug!("piles not laid out: {} has no seat", self.local_user);
            return;
        };
        let (Some(owners), Some(counts)) = (&snapshot.pile_owners, &snapshot.pile_counts) else {
            return;
        };

        let TableParts {
            tokens,
            visuals,
            piles,
            ..
        } = &mut self.parts;

        let mut columns = [0usize; SEAT_COUNT];
        for pile in PileId::deal_order(snapshot.start_pile()) {
            let count = counts.get(pile).unwrap_or(0);
            let owner = owners.get(pile).and_then(Seat::new).filter(|_| count > 0);

            let Some(owner) = owner else {
                piles.hide(pile, tokens, visuals);
                continue;
            };

            let column = &mut columns[owner.index()];
            piles.park(pile, owner, ViewSlot::relative(local, owner), *column);
            *column += 1;

            let target = usize::try_from(count).unwrap_or(usize::MAX);
            piles.ensure_count(pile, target, tokens, visuals);
            piles.settle_face_down(pile, tokens, visuals);
        }
    }

    /// Resizes the piles still drawn from after the dice, by count alone.
    fn sync_piles_from_counts(&mut self, snapshot: &RoomSnapshot) {
        let Some(counts) = &snapshot.pile_counts else {
            return;
        };

        let TableParts {
            tokens,
            visuals,
            piles,
            ..
        } = &mut self.parts;

        for pile in snapshot.synced_piles() {
            let Some(target) = counts.get(pile).and_then(|c| usize::try_from(c).ok()) else {
                continue;
            };
            piles.ensure_count(pile, target, tokens, visuals);
            piles.restack(pile, tokens);
        }
    }

    fn resolve_identities(&mut self, snapshot: &RoomSnapshot) {
        let disclosed = multiset_difference(self.cache.hand(), &snapshot.my_hand);
        let TableParts {
            tokens, visuals, ..
        } = &mut self.parts;
        self.resolver.resolve(disclosed, tokens, visuals);
    }

    /// Whether `handle` sits in the local player's rack.
    pub fn owns_tile(&self, handle: TileHandle) -> bool {
        self.local_seat
            .is_some_and(|seat| self.parts.racks.contains(seat, handle))
    }

    pub fn tile_by_id(&self, id: &TileId) -> Option<TileHandle> {
        self.resolver.tile_by_id(id)
    }

    pub fn placement(&self, handle: TileHandle) -> Placement {
        self.parts.tokens.tile(handle).placement()
    }

    /// World transform of a pile's root, once it has been laid out.
    pub fn pile_transform(&self, pile: PileId) -> Option<Transform> {
        self.parts.piles.world_transform(pile, &self.config.layout)
    }

    /// World transform of `seat`'s rack as seen from the local seat.
    pub fn rack_transform(&self, seat: Seat) -> Option<Transform> {
        let local = self.local_seat?;
        Some(self.config.layout.rack(ViewSlot::relative(local, seat)))
    }

    /// Tiles currently inside a flying bundle.
    pub fn in_flight(&self) -> usize {
        self.flights.iter().map(|f| f.tiles().len()).sum()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn hud(&self) -> HudState {
        self.hud
    }

    pub fn local_seat(&self) -> Option<Seat> {
        self.local_seat
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenPool {
        &self.parts.tokens
    }

    pub fn visuals(&self) -> &VisualPool {
        &self.parts.visuals
    }

    pub fn bundles(&self) -> &BundlePool {
        &self.parts.bundles
    }

    pub fn piles(&self) -> &PileRegistry {
        &self.parts.piles
    }

    pub fn racks(&self) -> &RackRegistry {
        &self.parts.racks
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }
}
