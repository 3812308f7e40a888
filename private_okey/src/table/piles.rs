//! The persistent face-down draw piles.

use glam::Vec3;

use super::layout::{SceneLayout, Transform, ViewSlot};
use crate::{
    game::{
        constants::PILE_COUNT,
        entities::{PileId, Seat},
    },
    pool::{Parent, TileHandle, TokenPool, VisualPool},
};

/// One draw pile. Index 0 of `tiles` is the bottom, the last element the top.
#[derive(Debug, Default)]
pub struct Pile {
    tiles: Vec<TileHandle>,
    owner: Option<Seat>,
    slot: Option<ViewSlot>,
    column: usize,
    visible: bool,
}

impl Pile {
    pub fn tiles(&self) -> &[TileHandle] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn owner(&self) -> Option<Seat> {
        self.owner
    }

    pub fn slot(&self) -> Option<ViewSlot> {
        self.slot
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The fixed set of piles. Piles are never recreated, only resized and
/// re-parented.
#[derive(Debug)]
pub struct PileRegistry {
    piles: Vec<Pile>,
    tile_step: f32,
    column_step: f32,
}

impl PileRegistry {
    /// `tile_step` spaces tiles inside a pile, `column_step` spaces the
    /// piles a seat owns.
    pub fn new(tile_step: f32, column_step: f32) -> Self {
        Self {
            piles: (0..PILE_COUNT).map(|_| Pile::default()).collect(),
            tile_step,
            column_step,
        }
    }

    pub fn get(&self, pile: PileId) -> &Pile {
        &self.piles[pile.index()]
    }

    pub fn len(&self, pile: PileId) -> usize {
        self.get(pile).len()
    }

    /// Tiles held across all piles.
    pub fn total_len(&self) -> usize {
        self.piles.iter().map(Pile::len).sum()
    }

    /// Resizes `pile` to `target` tiles.
    ///
    /// Growing pops handles from the free pool, shows them face-down and
    /// stacks them on top. Shrinking releases from the top. If the free pool
    /// runs dry the pile stays short. Returns the resulting length.
    pub fn ensure_count(
        &mut self,
        pile: PileId,
        target: usize,
        tokens: &mut TokenPool,
        visuals: &mut VisualPool,
    ) -> usize {
        let tile_step = self.tile_step;
        let tiles = &mut self.piles[pile.index()].tiles;

        while tiles.len() < target {
            let Some(handle) = tokens.acquire() else {
                log::warn!(
                    "{pile}: free pool exhausted at {} of {target} tiles",
                    tiles.len()
                );
                break;
            };
            tokens.set_back(handle, visuals);
            tokens.place(handle, Parent::Pile(pile), stack_offset(tiles.len(), tile_step));
            tiles.push(handle);
        }

        while tiles.len() > target {
            if let Some(handle) = tiles.pop() {
                tokens.release(handle, visuals);
            }
        }

        tiles.len()
    }

    /// Removes up to `n` tiles from the top of `pile`, top first, then
    /// restacks what is left. A short pile yields fewer tiles.
    pub fn take(&mut self, pile: PileId, n: usize, tokens: &mut TokenPool) -> Vec<TileHandle> {
        let tiles = &mut self.piles[pile.index()].tiles;
        let keep = tiles.len().saturating_sub(n);
        let taken: Vec<TileHandle> = tiles.drain(keep..).rev().collect();

        if taken.len() < n {
            log::warn!("{pile}: wanted {n} tiles, only {} available", taken.len());
        }

        self.restack(pile, tokens);
        taken
    }

    /// Re-offsets every tile still parented to `pile` by its index. Tiles
    /// that have been moved elsewhere are left alone.
    pub fn restack(&self, pile: PileId, tokens: &mut TokenPool) {
        for (i, &handle) in self.get(pile).tiles.iter().enumerate() {
            if tokens.tile(handle).placement().parent == Parent::Pile(pile) {
                tokens.place(handle, Parent::Pile(pile), stack_offset(i, self.tile_step));
            }
        }
    }

    /// Parks every tile of `pile` face-down, unidentified and stacked.
    pub fn settle_face_down(&self, pile: PileId, tokens: &mut TokenPool, visuals: &mut VisualPool) {
        for (i, &handle) in self.get(pile).tiles.iter().enumerate() {
            tokens.clear_id(handle);
            tokens.set_back(handle, visuals);
            tokens.place(handle, Parent::Pile(pile), stack_offset(i, self.tile_step));
        }
    }

    /// Releases every tile of `pile` back to the free pool.
    pub fn release_all(&mut self, pile: PileId, tokens: &mut TokenPool, visuals: &mut VisualPool) {
        let tiles = &mut self.piles[pile.index()].tiles;
        while let Some(handle) = tiles.pop() {
            tokens.release(handle, visuals);
        }
    }

    /// Empties and hides `pile`.
    pub fn hide(&mut self, pile: PileId, tokens: &mut TokenPool, visuals: &mut VisualPool) {
        self.release_all(pile, tokens, visuals);
        let entry = &mut self.piles[pile.index()];
        entry.visible = false;
        entry.owner = None;
    }

    /// Shows `pile` in `owner`'s area at the given column.
    pub fn park(&mut self, pile: PileId, owner: Seat, slot: ViewSlot, column: usize) {
        let entry = &mut self.piles[pile.index()];
        entry.owner = Some(owner);
        entry.slot = Some(slot);
        entry.column = column;
        entry.visible = true;
    }

    /// World transform of the pile's root, once it has been parked somewhere.
    pub fn world_transform(&self, pile: PileId, layout: &SceneLayout) -> Option<Transform> {
        let entry = self.get(pile);
        let area = layout.pile_area(entry.slot?);
        let local = Vec3::new(entry.column as f32 * self.column_step, 0.0, 0.0);
        Some(Transform::new(area.transform_point(local), area.rotation))
    }
}

fn stack_offset(index: usize, step: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, index as f32 * step)
}
