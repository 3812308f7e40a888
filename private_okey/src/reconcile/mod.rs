//! Snapshot reconciliation.
//!
//! This module ties the pools and registries together:
//! - [`TableParts`]: every pool and registry, built once and injected
//! - [`SnapshotCache`]: the previous snapshot's fields
//! - [`HudState`]: player count and auto-start countdown
//! - [`Reconciler`]: applies snapshots and ticks flights

pub mod cache;
pub mod driver;
pub mod hud;

pub use cache::SnapshotCache;
pub use driver::Reconciler;
pub use hud::HudState;

use crate::{
    config::EngineConfig,
    pool::{BundlePool, TokenPool, VisualPool},
    table::{PileRegistry, RackRegistry},
};

/// The mutable parts of a table. The reconciler owns them exclusively.
#[derive(Debug)]
pub struct TableParts {
    pub tokens: TokenPool,
    pub visuals: VisualPool,
    pub bundles: BundlePool,
    pub piles: PileRegistry,
    pub racks: RackRegistry,
}

impl TableParts {
    /// Allocates every tile handle and visual the table will ever use.
    pub fn warm_up(config: &EngineConfig) -> Self {
        Self {
            tokens: TokenPool::new(config.deck_size),
            visuals: VisualPool::warm_up(config),
            bundles: BundlePool::new(),
            piles: PileRegistry::new(config.tile_y_step, config.pile_x_step),
            racks: RackRegistry::new(config.pile_x_step),
        }
    }

    /// Handles outside the free pool, piles and racks. Non-zero only while
    /// a deal flight is in the air.
    pub fn unaccounted(&self) -> usize {
        self.tokens
            .capacity()
            .saturating_sub(self.tokens.free_len())
            .saturating_sub(self.piles.total_len())
            .saturating_sub(self.racks.total_len())
    }
}
