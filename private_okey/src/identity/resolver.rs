use std::collections::{HashMap, VecDeque};

use crate::{
    game::entities::TileId,
    pool::{TileHandle, TokenPool, VisualPool},
};

/// Identities in `current` that occur more often than in `last`, in the
/// order they appear in `current`. Duplicates are counted, so an identity
/// present once before and twice now is reported once.
pub fn multiset_difference(last: &[TileId], current: &[TileId]) -> Vec<TileId> {
    let mut remaining: HashMap<&TileId, usize> = HashMap::new();
    for id in last {
        *remaining.entry(id).or_default() += 1;
    }

    current
        .iter()
        .filter(|id| match remaining.get_mut(id) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}

/// The pending-tile / early-identity queue pair.
///
/// After every [`IdentityResolver::resolve`] at most one of the two queues
/// is non-empty.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    pending: VecDeque<TileHandle>,
    early: VecDeque<TileId>,
    by_id: HashMap<TileId, TileHandle>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a tile that just landed face-down in the local rack.
    pub fn push_pending(&mut self, handle: TileHandle) {
        self.pending.push_back(handle);
    }

    /// Pairs pending tiles with early identities until either runs out.
    /// Returns how many tiles were revealed.
    pub fn flush(&mut self, tokens: &mut TokenPool, visuals: &mut VisualPool) -> usize {
        let mut revealed = 0;
        while !self.pending.is_empty() && !self.early.is_empty() {
            if let (Some(handle), Some(id)) = (self.pending.pop_front(), self.early.pop_front()) {
                self.assign_one_pending(handle, id, tokens, visuals);
                revealed += 1;
            }
        }
        revealed
    }

    /// Applies the identities disclosed by one snapshot.
    ///
    /// Older buffered identities are paired first, then each new identity
    /// goes to the oldest pending tile or is buffered, then the queues are
    /// drained once more.
    pub fn resolve(
        &mut self,
        disclosed: Vec<TileId>,
        tokens: &mut TokenPool,
        visuals: &mut VisualPool,
    ) -> usize {
        let mut revealed = self.flush(tokens, visuals);

        for id in disclosed {
            match self.pending.pop_front() {
                Some(handle) => {
                    self.assign_one_pending(handle, id, tokens, visuals);
                    revealed += 1;
                }
                None => self.early.push_back(id),
            }
        }

        revealed + self.flush(tokens, visuals)
    }

    /// Binds `id` to `handle` and turns the tile face-up.
    pub fn assign_one_pending(
        &mut self,
        handle: TileHandle,
        id: TileId,
        tokens: &mut TokenPool,
        visuals: &mut VisualPool,
    ) {
        if id.is_empty() {
            return;
        }

        tokens.set_face(handle, id.face_code(), visuals);
        tokens.assign_id(handle, id.clone());
        log::debug!("{handle} revealed as {id}");
        self.by_id.insert(id, handle);
    }

    /// Drops both queues and the identity index.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.early.clear();
        self.by_id.clear();
    }

    pub fn tile_by_id(&self, id: &TileId) -> Option<TileHandle> {
        self.by_id.get(id).copied()
    }

    pub fn pending(&self) -> impl Iterator<Item = TileHandle> + '_ {
        self.pending.iter().copied()
    }

    pub fn early(&self) -> impl Iterator<Item = &TileId> {
        self.early.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn early_len(&self) -> usize {
        self.early.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, game::entities::FaceKey};

    fn ids(raw: &[&str]) -> Vec<TileId> {
        raw.iter().copied().map(TileId::new).collect()
    }

    fn pools() -> (TokenPool, VisualPool) {
        let config = EngineConfig::default();
        (TokenPool::new(config.deck_size), VisualPool::warm_up(&config))
    }

    fn face_down(tokens: &mut TokenPool, visuals: &mut VisualPool, n: usize) -> Vec<TileHandle> {
        (0..n)
            .map(|_| {
                let handle = tokens.acquire().unwrap();
                tokens.set_back(handle, visuals);
                handle
            })
            .collect()
    }

    #[test]
    fn test_multiset_difference_counts_duplicates() {
        assert_eq!(
            multiset_difference(&ids(&["A", "A", "B"]), &ids(&["A", "B", "B"])),
            ids(&["B"])
        );
        assert_eq!(
            multiset_difference(&[], &ids(&["C", "A", "C"])),
            ids(&["C", "A", "C"])
        );
        assert!(multiset_difference(&ids(&["A"]), &[]).is_empty());
    }

    #[test]
    fn test_identities_wait_for_tiles() {
        let (mut tokens, mut visuals) = pools();
        let mut resolver = IdentityResolver::new();

        assert_eq!(resolver.resolve(ids(&["R01-1", "G05-2"]), &mut tokens, &mut visuals), 0);
        assert_eq!(resolver.early_len(), 2);

        let tiles = face_down(&mut tokens, &mut visuals, 3);
        for &handle in &tiles {
            resolver.push_pending(handle);
        }
        assert_eq!(resolver.flush(&mut tokens, &mut visuals), 2);

        assert_eq!(tokens.tile(tiles[0]).id(), Some(&TileId::new("R01-1")));
        assert_eq!(tokens.tile(tiles[1]).visual_key(), Some(&FaceKey::face("G05")));
        assert!(tokens.tile(tiles[2]).is_face_down());
        assert_eq!(resolver.pending_len(), 1);
        assert_eq!(resolver.early_len(), 0);
    }

    #[test]
    fn test_tiles_wait_for_identities() {
        let (mut tokens, mut visuals) = pools();
        let mut resolver = IdentityResolver::new();
        let tiles = face_down(&mut tokens, &mut visuals, 2);
        for &handle in &tiles {
            resolver.push_pending(handle);
        }

        resolver.resolve(ids(&["JOKER-1"]), &mut tokens, &mut visuals);
        assert_eq!(tokens.tile(tiles[0]).visual_key(), Some(&FaceKey::joker()));
        assert_eq!(resolver.pending_len(), 1);

        resolver.resolve(ids(&["K13-2"]), &mut tokens, &mut visuals);
        assert_eq!(resolver.tile_by_id(&TileId::new("K13-2")), Some(tiles[1]));
        assert_eq!(resolver.pending_len(), 0);
    }

    #[test]
    fn test_buffered_identities_pair_before_new_ones() {
        let (mut tokens, mut visuals) = pools();
        let mut resolver = IdentityResolver::new();
        resolver.resolve(ids(&["B01-1"]), &mut tokens, &mut visuals);

        let tiles = face_down(&mut tokens, &mut visuals, 2);
        for &handle in &tiles {
            resolver.push_pending(handle);
        }
        resolver.resolve(ids(&["B02-1"]), &mut tokens, &mut visuals);

        assert_eq!(tokens.tile(tiles[0]).id(), Some(&TileId::new("B01-1")));
        assert_eq!(tokens.tile(tiles[1]).id(), Some(&TileId::new("B02-1")));
    }

    #[test]
    fn test_clear_drops_everything() {
        let (mut tokens, mut visuals) = pools();
        let mut resolver = IdentityResolver::new();
        let tile = face_down(&mut tokens, &mut visuals, 1)[0];
        resolver.push_pending(tile);
        resolver.resolve(ids(&["R09-1", "R10-1"]), &mut tokens, &mut visuals);

        resolver.clear();

        assert_eq!(resolver.pending_len(), 0);
        assert_eq!(resolver.early_len(), 0);
        assert_eq!(resolver.tile_by_id(&TileId::new("R09-1")), None);
    }
}
