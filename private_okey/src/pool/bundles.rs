//! Grouping handles used to fly a dealt batch as one unit.

use glam::{Quat, Vec3};

use super::tiles::{Parent, TileHandle, TokenPool};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BundleId(u16);

impl BundleId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

#[derive(Debug)]
pub struct Bundle {
    children: Vec<TileHandle>,
    position: Vec3,
    rotation: Quat,
    active: bool,
}

impl Bundle {
    fn parked() -> Self {
        Self {
            children: Vec::new(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            active: false,
        }
    }

    pub fn children(&self) -> &[TileHandle] {
        &self.children
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Pool of deal bundles. Grows on demand; bundles are never destroyed.
#[derive(Debug, Default)]
pub struct BundlePool {
    bundles: Vec<Bundle>,
    idle: Vec<BundleId>,
}

impl BundlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows an idle bundle, creating one if none is idle.
    pub fn borrow(&mut self) -> BundleId {
        let id = self.idle.pop().unwrap_or_else(|| {
            self.bundles.push(Bundle::parked());
            BundleId((self.bundles.len() - 1) as u16)
        });
        let bundle = &mut self.bundles[id.index()];
        bundle.active = true;
        bundle.position = Vec3::ZERO;
        bundle.rotation = Quat::IDENTITY;
        id
    }

    pub fn attach(&mut self, id: BundleId, tile: TileHandle) {
        self.bundles[id.index()].children.push(tile);
    }

    pub fn set_transform(&mut self, id: BundleId, position: Vec3, rotation: Quat) {
        let bundle = &mut self.bundles[id.index()];
        bundle.position = position;
        bundle.rotation = rotation;
    }

    pub fn set_position(&mut self, id: BundleId, position: Vec3) {
        self.bundles[id.index()].position = position;
    }

    /// Detaches every child still parented to the bundle and parks it idle.
    pub fn give_back(&mut self, id: BundleId, tokens: &mut TokenPool) {
        let bundle = &mut self.bundles[id.index()];
        if !bundle.active {
            log::error!("bundle {} returned while idle", id.0);
            return;
        }

        for tile in bundle.children.drain(..) {
            let placement = tokens.tile(tile).placement();
            if placement.parent == Parent::Bundle(id) {
                tokens.place(tile, Parent::Scene, bundle.position + placement.offset);
            }
        }
        *bundle = Bundle::parked();
        self.idle.push(id);
    }

    pub fn get(&self, id: BundleId) -> &Bundle {
        &self.bundles[id.index()]
    }

    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
