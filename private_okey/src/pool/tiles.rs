//! The fixed set of physical tile handles.

use glam::Vec3;
use std::fmt;

use super::{
    bundles::BundleId,
    errors::PoolError,
    visuals::{VisualId, VisualPool},
};
use crate::game::entities::{FaceKey, PileId, Seat, TileId};

/// Stable index of a tile handle. Valid for the lifetime of its pool.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TileHandle(u16);

impl TileHandle {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for TileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{:03}", self.0)
    }
}

/// The visual currently shown by a tile. A tile holds at most one.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum VisualBinding {
    #[default]
    Unbound,
    Bound { key: FaceKey, visual: VisualId },
}

/// Container a tile is parented under.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Parent {
    /// Parked in the pool, not shown.
    #[default]
    PoolRoot,
    /// Unparented, at its last world position.
    Scene,
    Pile(PileId),
    Rack(Seat),
    Bundle(BundleId),
}

/// Where a renderer should draw a tile: a parent container plus a local
/// offset inside it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub parent: Parent,
    pub offset: Vec3,
}

/// One physical tile.
#[derive(Debug, Default)]
pub struct Tile {
    id: Option<TileId>,
    binding: VisualBinding,
    placement: Placement,
}

impl Tile {
    /// The identity assigned by the server, `None` while face-down/unknown.
    pub fn id(&self) -> Option<&TileId> {
        self.id.as_ref()
    }

    pub fn binding(&self) -> &VisualBinding {
        &self.binding
    }

    pub fn visual_key(&self) -> Option<&FaceKey> {
        match &self.binding {
            VisualBinding::Bound { key, .. } => Some(key),
            VisualBinding::Unbound => None,
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_face_down(&self) -> bool {
        self.visual_key() == Some(&FaceKey::Back)
    }
}

/// Fixed-capacity pool of tile handles.
///
/// Every handle is created up front. Handles move between the free list and
/// the table containers; only their identity, visual and placement change.
#[derive(Debug)]
pub struct TokenPool {
    tiles: Vec<Tile>,
    free: Vec<TileHandle>,
    is_free: Vec<bool>,
}

impl TokenPool {
    /// Creates `capacity` free handles. `acquire` hands them out lowest
    /// index first.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(usize::from(u16::MAX));
        Self {
            tiles: (0..capacity).map(|_| Tile::default()).collect(),
            free: (0..capacity).rev().map(|i| TileHandle(i as u16)).collect(),
            is_free: vec![true; capacity],
        }
    }

    /// Pops a free handle, or `None` if every handle is in use.
    pub fn acquire(&mut self) -> Option<TileHandle> {
        let handle = self.free.pop()?;
        self.is_free[handle.index()] = false;
        Some(handle)
    }

    /// Like [`TokenPool::acquire`], with the exhaustion reported as an error.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TokensExhausted`] when no handle is free.
    pub fn try_acquire(&mut self) -> Result<TileHandle, PoolError> {
        self.acquire().ok_or(PoolError::TokensExhausted {
            capacity: self.capacity(),
        })
    }

    /// Clears the tile's identity, returns its visual to `visuals` and puts
    /// the handle back on the free list. Releasing a free handle is a no-op.
    pub fn release(&mut self, handle: TileHandle, visuals: &mut VisualPool) {
        if self.is_free[handle.index()] {
            log::error!("{handle} released while already free");
            return;
        }

        self.return_visual(handle, visuals);
        let tile = &mut self.tiles[handle.index()];
        tile.id = None;
        tile.placement = Placement::default();

        self.is_free[handle.index()] = true;
        self.free.push(handle);
    }

    /// Binds a visual for `key`, first returning any visual already bound.
    ///
    /// On exhaustion the error is logged and the tile is left without a
    /// visual. Returns whether a visual was bound.
    pub fn attach_visual(
        &mut self,
        handle: TileHandle,
        key: FaceKey,
        visuals: &mut VisualPool,
    ) -> bool {
        self.return_visual(handle, visuals);
        match visuals.take(&key) {
            Ok(visual) => {
                self.tiles[handle.index()].binding = VisualBinding::Bound { key, visual };
                true
            }
            Err(error) => {
                log::error!("{handle}: {error}");
                false
            }
        }
    }

    /// Unbinds the tile's visual and hands it to the caller, who must return
    /// it to the pool under the returned key.
    pub fn detach_visual(&mut self, handle: TileHandle) -> Option<(FaceKey, VisualId)> {
        match std::mem::take(&mut self.tiles[handle.index()].binding) {
            VisualBinding::Bound { key, visual } => Some((key, visual)),
            VisualBinding::Unbound => None,
        }
    }

    /// Shows the tile face-down.
    pub fn set_back(&mut self, handle: TileHandle, visuals: &mut VisualPool) -> bool {
        self.attach_visual(handle, FaceKey::Back, visuals)
    }

    /// Shows the tile's face for `code`.
    pub fn set_face(&mut self, handle: TileHandle, code: &str, visuals: &mut VisualPool) -> bool {
        if code.is_empty() {
            return false;
        }
        self.attach_visual(handle, FaceKey::face(code), visuals)
    }

    pub fn assign_id(&mut self, handle: TileHandle, id: TileId) {
        self.tiles[handle.index()].id = (!id.is_empty()).then_some(id);
    }

    pub fn clear_id(&mut self, handle: TileHandle) {
        self.tiles[handle.index()].id = None;
    }

    pub fn place(&mut self, handle: TileHandle, parent: Parent, offset: Vec3) {
        self.tiles[handle.index()].placement = Placement { parent, offset };
    }

    pub fn tile(&self, handle: TileHandle) -> &Tile {
        &self.tiles[handle.index()]
    }

    pub fn handles(&self) -> impl Iterator<Item = TileHandle> {
        (0..self.tiles.len()).map(|i| TileHandle(i as u16))
    }

    pub fn is_free(&self, handle: TileHandle) -> bool {
        self.is_free[handle.index()]
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.tiles.len()
    }

    fn return_visual(&mut self, handle: TileHandle, visuals: &mut VisualPool) {
        if let Some((key, visual)) = self.detach_visual(handle)
            && let Err(error) = visuals.give_back(&key, visual)
        {
            log::error!("{handle}: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pools() -> (TokenPool, VisualPool) {
        let mut visuals = VisualPool::new();
        visuals.provision(FaceKey::Back, 4);
        visuals.provision(FaceKey::face("R01"), 1);
        (TokenPool::new(4), visuals)
    }

    #[test]
    fn test_acquire_hands_out_every_handle_once() {
        let (mut tokens, _) = pools();
        let mut seen = Vec::new();
        while let Some(handle) = tokens.acquire() {
            seen.push(handle.index());
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(tokens.try_acquire().is_err());
    }

    #[test]
    fn test_attach_replaces_previous_visual() {
        let (mut tokens, mut visuals) = pools();
        let handle = tokens.acquire().unwrap();

        assert!(tokens.set_back(handle, &mut visuals));
        assert!(tokens.set_back(handle, &mut visuals));
        assert_eq!(visuals.bound_count(&FaceKey::Back), 1);

        assert!(tokens.set_face(handle, "R01", &mut visuals));
        assert_eq!(visuals.bound_count(&FaceKey::Back), 0);
        assert_eq!(tokens.tile(handle).visual_key(), Some(&FaceKey::face("R01")));
    }

    #[test]
    fn test_exhausted_face_leaves_tile_unbound() {
        let (mut tokens, mut visuals) = pools();
        let a = tokens.acquire().unwrap();
        let b = tokens.acquire().unwrap();

        assert!(tokens.set_face(a, "R01", &mut visuals));
        tokens.set_back(b, &mut visuals);
        assert!(!tokens.set_face(b, "R01", &mut visuals));

        // The back was returned before the failed take.
        assert_eq!(*tokens.tile(b).binding(), VisualBinding::Unbound);
        assert_eq!(visuals.idle_count(&FaceKey::Back), 4);
    }

    #[test]
    fn test_release_clears_and_returns_visual() {
        let (mut tokens, mut visuals) = pools();
        let handle = tokens.acquire().unwrap();
        tokens.set_face(handle, "R01", &mut visuals);
        tokens.assign_id(handle, TileId::new("R01-1"));
        tokens.place(handle, Parent::Scene, Vec3::X);

        tokens.release(handle, &mut visuals);

        let tile = tokens.tile(handle);
        assert!(tile.id().is_none());
        assert_eq!(*tile.binding(), VisualBinding::Unbound);
        assert_eq!(tile.placement().parent, Parent::PoolRoot);
        assert_eq!(visuals.idle_count(&FaceKey::face("R01")), 1);
        assert_eq!(tokens.free_len(), 4);
    }

    #[test]
    fn test_double_release_is_ignored() {
        let (mut tokens, mut visuals) = pools();
        let handle = tokens.acquire().unwrap();
        tokens.release(handle, &mut visuals);
        tokens.release(handle, &mut visuals);
        assert_eq!(tokens.free_len(), 4);
    }

    #[test]
    fn test_detach_hands_visual_to_caller() {
        let (mut tokens, mut visuals) = pools();
        let handle = tokens.acquire().unwrap();
        tokens.set_back(handle, &mut visuals);

        let (key, visual) = tokens.detach_visual(handle).unwrap();
        assert_eq!(key, FaceKey::Back);
        assert!(tokens.detach_visual(handle).is_none());
        visuals.give_back(&key, visual).unwrap();
        assert_eq!(visuals.idle_count(&FaceKey::Back), 4);
    }
}
