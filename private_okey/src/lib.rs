//! # Private Okey
//!
//! Client-side table synchronisation for a four-seat Okey game.
//!
//! The server pushes authoritative room snapshots. This library reconciles
//! each one into a fixed set of reusable tile handles and visual instances,
//! animates the deal implied by successive snapshots, and pairs the tiles
//! that physically land in the local player's rack with the identities the
//! server discloses for them, whichever of the two arrives first.
//!
//! ## Architecture
//!
//! Everything is owned by one [`Reconciler`] and mutated from a single tick:
//!
//! - **Token pool**: 106 tile handles, created once and only ever rebound
//! - **Visual pool**: face-down and face visuals keyed by face code
//! - **Pile registry**: 15 persistent face-down draw piles
//! - **Rack registry**: one arrival-ordered rack per seat
//! - **Deal bundles**: grouping handles used while a batch is in flight
//! - **Identity resolver**: the pending-tile / early-identity queue pair
//! - **Snapshot cache**: the previous snapshot's fields, used for diffing
//!
//! ## Core Modules
//!
//! - [`game`]: constants and small value types (piles, seats, identities)
//! - [`pool`]: token, visual and bundle pools
//! - [`table`]: pile and rack registries and the scene layout
//! - [`deal`]: deal-tick detection and the flight state machine
//! - [`identity`]: multiset diffing and identity assignment
//! - [`net`]: the wire model of inbound and outbound frames
//! - [`reconcile`]: the per-snapshot driver
//!
//! ## Example
//!
//! ```
//! use private_okey::{EngineConfig, Reconciler, net::ServerMessage};
//! use std::time::Duration;
//!
//! let mut reconciler = Reconciler::with_defaults(EngineConfig::default(), "alice");
//! let frame = r#"{"t":"ROOM_SNAPSHOT","p":{"state":"AUTO_START","autoStartLeft":5}}"#;
//! if let Ok(ServerMessage::RoomSnapshot(snapshot)) = ServerMessage::parse(frame) {
//!     reconciler.apply(&snapshot);
//! }
//! reconciler.tick(Duration::from_millis(16));
//! assert_eq!(reconciler.hud().countdown, Some(5));
//! ```

/// Engine configuration and scene layout defaults.
pub mod config;
pub use config::{ConfigError, EngineConfig};

/// Constants and value types shared by every other module.
pub mod game;
pub use game::{
    constants::{self, DECK_SIZE, PILE_COUNT, SEAT_COUNT},
    entities::{self, FaceKey, PileId, PileTable, Seat, TileId},
};

/// Reusable tile handles, visual instances and deal bundles.
pub mod pool;
pub use pool::{BundlePool, PoolError, TileHandle, TokenPool, VisualPool};

/// Persistent pile and rack containers.
pub mod table;
pub use table::{PileRegistry, RackRegistry, SceneLayout, ViewSlot};

/// Deal-tick detection and flight animation.
pub mod deal;

/// Pending tile / early identity pairing.
pub mod identity;
pub use identity::{IdentityResolver, multiset_difference};

/// Wire model for server and client frames.
pub mod net;

/// The per-snapshot reconciliation driver.
pub mod reconcile;
pub use reconcile::{HudState, Reconciler, TableParts};
