//! Reusable object pools.
//!
//! This module implements the three pools the table is built from:
//! - [`TokenPool`]: one handle per physical tile, created once
//! - [`VisualPool`]: renderable instances keyed by face code
//! - [`BundlePool`]: grouping handles for deal flights
//!
//! Nothing is allocated after warm-up except bundles, which are cheap and
//! grow on demand.

pub mod bundles;
pub mod errors;
pub mod tiles;
pub mod visuals;

pub use bundles::{Bundle, BundleId, BundlePool};
pub use errors::{PoolError, PoolResult};
pub use tiles::{Parent, Placement, Tile, TileHandle, TokenPool, VisualBinding};
pub use visuals::{VisualId, VisualPool};
