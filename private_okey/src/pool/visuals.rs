//! Keyed pool of reusable visual instances.

use std::collections::{BTreeMap, HashMap};

use super::errors::{PoolError, PoolResult};
use crate::{config::EngineConfig, game::entities::FaceKey};

/// Stable id of one visual instance.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VisualId(u32);

impl VisualId {
    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct VisualInstance {
    key: FaceKey,
    active: bool,
}

/// Renderable instances grouped into one idle stack per face key.
///
/// Instances are only created by [`VisualPool::provision`]; after warm-up the
/// number of instances per key never changes, so
/// `idle_count(key) + bound_count(key) == capacity(key)` always holds.
#[derive(Debug, Default)]
pub struct VisualPool {
    instances: Vec<VisualInstance>,
    idle: HashMap<FaceKey, Vec<VisualId>>,
    capacity: BTreeMap<FaceKey, usize>,
}

impl VisualPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions the standard Okey visual set: one back per deck tile,
    /// `face_copies` per colour/rank code and `joker_copies` jokers.
    pub fn warm_up(config: &EngineConfig) -> Self {
        let mut pool = Self::new();
        pool.provision(FaceKey::Back, config.deck_size);
        for code in FaceKey::colored_codes() {
            pool.provision(FaceKey::Face(code), config.face_copies);
        }
        pool.provision(FaceKey::joker(), config.joker_copies);
        log::debug!(
            "visual pool warmed up: {} instances across {} keys",
            pool.instances.len(),
            pool.capacity.len()
        );
        pool
    }

    /// Creates `count` idle instances under `key`. A key is provisioned once;
    /// later calls for the same key are ignored.
    pub fn provision(&mut self, key: FaceKey, count: usize) {
        if self.capacity.contains_key(&key) {
            return;
        }

        let stack = self.idle.entry(key.clone()).or_default();
        for _ in 0..count {
            let id = VisualId(self.instances.len() as u32);
            self.instances.push(VisualInstance {
                key: key.clone(),
                active: false,
            });
            stack.push(id);
        }
        self.capacity.insert(key, count);
    }

    /// Pops an idle instance for `key` and marks it active.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::VisualExhausted`] if the key has no idle instance
    /// left (or was never provisioned).
    pub fn take(&mut self, key: &FaceKey) -> PoolResult<VisualId> {
        let id = self
            .idle
            .get_mut(key)
            .and_then(Vec::pop)
            .ok_or_else(|| PoolError::VisualExhausted { key: key.clone() })?;
        self.instances[id.0 as usize].active = true;
        Ok(id)
    }

    /// Returns an active instance to its idle stack.
    ///
    /// The instance is always filed under the key it was provisioned for. A
    /// mismatching `key` is logged as an integrity error.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or the instance is already idle;
    /// the pool is left untouched in both cases.
    pub fn give_back(&mut self, key: &FaceKey, visual: VisualId) -> PoolResult<()> {
        let instance = self
            .instances
            .get_mut(visual.0 as usize)
            .ok_or(PoolError::UnknownVisual(visual.0))?;
        if !instance.active {
            return Err(PoolError::VisualAlreadyIdle(visual.0));
        }
        if &instance.key != key {
            log::error!(
                "visual {} returned under {key} but belongs to {}",
                visual.0,
                instance.key
            );
        }

        instance.active = false;
        self.idle
            .entry(instance.key.clone())
            .or_default()
            .push(visual);
        Ok(())
    }

    pub fn is_active(&self, visual: VisualId) -> bool {
        self.instances
            .get(visual.0 as usize)
            .is_some_and(|v| v.active)
    }

    pub fn idle_count(&self, key: &FaceKey) -> usize {
        self.idle.get(key).map_or(0, Vec::len)
    }

    pub fn capacity(&self, key: &FaceKey) -> usize {
        self.capacity.get(key).copied().unwrap_or(0)
    }

    pub fn bound_count(&self, key: &FaceKey) -> usize {
        self.instances
            .iter()
            .filter(|v| v.active && &v.key == key)
            .count()
    }

    /// Every provisioned key, in a stable order.
    pub fn keys(&self) -> impl Iterator<Item = &FaceKey> {
        self.capacity.keys()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_up_sizes() {
        let pool = VisualPool::warm_up(&EngineConfig::default());
        assert_eq!(pool.capacity(&FaceKey::Back), 106);
        assert_eq!(pool.capacity(&FaceKey::face("R07")), 2);
        assert_eq!(pool.capacity(&FaceKey::joker()), 2);
        assert_eq!(pool.len(), 106 + 52 * 2 + 2);
    }

    #[test]
    fn test_take_until_exhausted() {
        let mut pool = VisualPool::new();
        let key = FaceKey::face("G03");
        pool.provision(key.clone(), 2);

        assert!(pool.take(&key).is_ok());
        assert!(pool.take(&key).is_ok());
        assert_eq!(
            pool.take(&key),
            Err(PoolError::VisualExhausted { key: key.clone() })
        );
        assert_eq!(pool.bound_count(&key), 2);
        assert_eq!(pool.idle_count(&key), 0);
    }

    #[test]
    fn test_unprovisioned_key_is_exhausted() {
        let mut pool = VisualPool::new();
        assert!(matches!(
            pool.take(&FaceKey::face("X99")),
            Err(PoolError::VisualExhausted { .. })
        ));
    }

    #[test]
    fn test_give_back_under_wrong_key_files_under_owner() {
        let mut pool = VisualPool::new();
        pool.provision(FaceKey::Back, 1);
        pool.provision(FaceKey::face("B01"), 1);

        let back = pool.take(&FaceKey::Back).unwrap();
        pool.give_back(&FaceKey::face("B01"), back).unwrap();

        assert_eq!(pool.idle_count(&FaceKey::Back), 1);
        assert_eq!(pool.idle_count(&FaceKey::face("B01")), 1);
    }

    #[test]
    fn test_double_give_back_is_rejected() {
        let mut pool = VisualPool::new();
        pool.provision(FaceKey::Back, 1);
        let back = pool.take(&FaceKey::Back).unwrap();
        pool.give_back(&FaceKey::Back, back).unwrap();

        assert_eq!(
            pool.give_back(&FaceKey::Back, back),
            Err(PoolError::VisualAlreadyIdle(back.get()))
        );
        assert_eq!(pool.idle_count(&FaceKey::Back), 1);
    }

    #[test]
    fn test_provision_is_once_per_key() {
        let mut pool = VisualPool::new();
        pool.provision(FaceKey::Back, 3);
        pool.provision(FaceKey::Back, 10);
        assert_eq!(pool.capacity(&FaceKey::Back), 3);
        assert_eq!(pool.len(), 3);
    }
}
