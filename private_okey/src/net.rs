//! Wire model for the JSON websocket protocol.
//!
//! Every frame is an envelope `{"t": <type>, "p": <payload>}`. Inbound
//! payloads are read leniently: numbers may arrive as strings, maps are
//! keyed by stringified integers, and malformed entries are skipped rather
//! than failing the whole frame.

/// Frame decoding errors.
pub mod errors;

/// Field-level deserializers that tolerate loosely typed server data.
mod lenient;

/// Inbound and outbound frame types.
pub mod messages;

/// The room snapshot payload.
pub mod snapshot;

pub use errors::{SnapshotError, SnapshotResult};
pub use messages::{ClientCommand, ClientMessage, PlayerPublic, RoomPublic, ServerMessage};
pub use snapshot::{PlayerEntry, RoomSnapshot, RoomState};
