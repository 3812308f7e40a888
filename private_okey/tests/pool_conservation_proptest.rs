//! Property-based tests for pool conservation and hand diffing.

use private_okey::{
    EngineConfig, FaceKey, PileId, PileRegistry, TileId, TokenPool, VisualPool,
    multiset_difference,
};
use proptest::prelude::*;
use std::collections::HashMap;

fn parts() -> (EngineConfig, PileRegistry, TokenPool, VisualPool) {
    let config = EngineConfig::default();
    let piles = PileRegistry::new(config.tile_y_step, config.pile_x_step);
    let tokens = TokenPool::new(config.deck_size);
    let visuals = VisualPool::warm_up(&config);
    (config, piles, tokens, visuals)
}

fn tile_id_strategy() -> impl Strategy<Value = TileId> {
    (prop::sample::select(vec!["B", "G", "R", "K"]), 1u8..=3, 1u8..=2)
        .prop_map(|(color, rank, copy)| TileId::new(&format!("{color}{rank:02}-{copy}")))
}

fn counts(ids: &[TileId]) -> HashMap<&TileId, usize> {
    let mut map = HashMap::new();
    for id in ids {
        *map.entry(id).or_default() += 1;
    }
    map
}

proptest! {
    #[test]
    fn test_ensure_count_tracks_target_and_conserves(
        ops in prop::collection::vec((1i64..=15, 0usize..=12), 1..60)
    ) {
        let (config, mut piles, mut tokens, mut visuals) = parts();
        let mut targets: HashMap<i64, usize> = HashMap::new();

        for (raw, target) in ops {
            let pile = PileId::new(raw).unwrap();
            let others: usize = targets
                .iter()
                .filter(|&(&p, _)| p != raw)
                .map(|(_, &n)| n)
                .sum();
            let reachable = target.min(config.deck_size - others);

            let len = piles.ensure_count(pile, target, &mut tokens, &mut visuals);
            targets.insert(raw, len);

            prop_assert_eq!(len, reachable);
            prop_assert_eq!(tokens.free_len() + piles.total_len(), config.deck_size);
            prop_assert_eq!(visuals.bound_count(&FaceKey::Back), piles.total_len());
        }
    }

    #[test]
    fn test_take_then_restore_is_indistinguishable(
        start in 1usize..=8,
        take in 0usize..=10,
    ) {
        let (_, mut piles, mut tokens, mut visuals) = parts();
        let pile = PileId::new(5).unwrap();
        piles.ensure_count(pile, start, &mut tokens, &mut visuals);

        let taken = piles.take(pile, take, &mut tokens);
        prop_assert_eq!(taken.len(), take.min(start));
        for handle in taken {
            tokens.release(handle, &mut visuals);
        }
        piles.ensure_count(pile, start, &mut tokens, &mut visuals);

        prop_assert_eq!(piles.len(pile), start);
        for (i, &handle) in piles.get(pile).tiles().iter().enumerate() {
            let tile = tokens.tile(handle);
            prop_assert!(tile.is_face_down());
            prop_assert_eq!(tile.placement().offset.z, i as f32 * 0.004);
        }
        prop_assert_eq!(tokens.free_len() + start, 106);
    }

    #[test]
    fn test_visuals_are_conserved_per_key(
        codes in prop::collection::vec(prop::sample::select(vec!["R01", "K13", "JOKER"]), 0..12)
    ) {
        let (_, _, mut tokens, mut visuals) = parts();
        let mut held = Vec::new();
        for code in codes {
            let handle = tokens.acquire().unwrap();
            tokens.set_face(handle, code, &mut visuals);
            held.push(handle);

            for key in [FaceKey::face("R01"), FaceKey::face("K13"), FaceKey::joker()] {
                prop_assert_eq!(
                    visuals.idle_count(&key) + visuals.bound_count(&key),
                    visuals.capacity(&key)
                );
                prop_assert!(visuals.bound_count(&key) <= 2);
            }
        }

        for handle in held {
            tokens.release(handle, &mut visuals);
        }
        for key in visuals.keys() {
            prop_assert_eq!(visuals.idle_count(key), visuals.capacity(key));
        }
    }

    #[test]
    fn test_multiset_difference_counts(
        last in prop::collection::vec(tile_id_strategy(), 0..14),
        current in prop::collection::vec(tile_id_strategy(), 0..14),
    ) {
        let diff = multiset_difference(&last, &current);
        let (before, now, added) = (counts(&last), counts(&current), counts(&diff));

        for (id, &n) in &now {
            let expected = n.saturating_sub(before.get(id).copied().unwrap_or(0));
            prop_assert_eq!(added.get(id).copied().unwrap_or(0), expected);
        }
        prop_assert!(added.keys().all(|id| now.contains_key(id)));
    }

    #[test]
    fn test_appending_to_hand_discloses_the_suffix(
        kept in prop::collection::vec(tile_id_strategy(), 0..14),
        appended in prop::collection::vec(tile_id_strategy(), 0..7),
    ) {
        let mut current = kept.clone();
        current.extend(appended.iter().cloned());
        prop_assert_eq!(multiset_difference(&kept, &current), appended);
    }
}
