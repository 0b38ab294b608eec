use broadphase::{Aabb, Config, LazyAabbTree, ProxyKey};
use nalgebra::Vector2;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

type Tree = LazyAabbTree<u8, u8>;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, Aabb),
    Move(u8, f32, f32),
    Remove(u8),
    Rebuild,
}

fn arb_aabb() -> impl Strategy<Value = Aabb> {
    (-50.0f32..50.0, -50.0f32..50.0, 0.0f32..6.0, 0.0f32..6.0)
        .prop_map(|(x, y, w, h)| Aabb::from_min_max(x, y, x + w, y + h))
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..32, arb_aabb()).prop_map(|(id, aabb)| Op::Insert(id, aabb)),
        4 => (0u8..32, -3.0f32..3.0, -3.0f32..3.0).prop_map(|(id, dx, dy)| Op::Move(id, dx, dy)),
        2 => (0u8..32).prop_map(Op::Remove),
        1 => Just(Op::Rebuild),
    ]
}

fn arb_config() -> impl Strategy<Value = Config> {
    (
        0.0f32..0.5,
        0.0f32..0.2,
        0.0f32..3.0,
        0usize..8,
        any::<bool>(),
    )
        .prop_map(
            |(margin, size_ratio, multiplier, min_removals, auto_rebuild)| Config {
                fat_margin: margin,
                fat_size_ratio: size_ratio,
                displacement_multiplier: multiplier,
                rebuild_min_removals: min_removals,
                auto_rebuild,
                ..Config::default()
            },
        )
}

fn key(id: u8) -> ProxyKey<u8, u8> {
    ProxyKey::new(id, 0)
}

/// Applies `ops` to both the tree and a plain map of geometric boxes.
fn run(config: Config, ops: &[Op]) -> (Tree, HashMap<u8, Aabb>) {
    let mut tree = Tree::new_with_config(config).unwrap();
    let mut model: HashMap<u8, Aabb> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(id, aabb) => {
                tree.insert_aabb(key(*id), *aabb).unwrap();
                model.insert(*id, *aabb);
            }
            Op::Move(id, dx, dy) => match model.get_mut(id) {
                Some(aabb) => {
                    *aabb = aabb.translated(Vector2::new(*dx, *dy));
                    tree.update_aabb(key(*id), *aabb).unwrap();
                }
                None => {
                    let unit = Aabb::from_min_max(0.0, 0.0, 1.0, 1.0);
                    assert!(tree.update_aabb(key(*id), unit).is_err());
                }
            },
            Op::Remove(id) => {
                let removed = tree.remove_key(&key(*id));
                assert_eq!(removed.is_ok(), model.remove(id).is_some());
            }
            Op::Rebuild => tree.rebuild(),
        }
    }
    (tree, model)
}

proptest! {
    #[test]
    fn structure_stays_consistent(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 0..200),
    ) {
        let (tree, model) = run(config, &ops);
        tree.validate();
        prop_assert_eq!(tree.len(), model.len());
        for (id, aabb) in &model {
            let stored = tree.aabb_of(&key(*id));
            prop_assert!(stored.map_or(false, |fat| fat.contains(aabb)));
        }
    }

    #[test]
    fn pairs_cover_every_overlap_exactly_once(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 0..200),
    ) {
        let (tree, model) = run(config, &ops);

        let mut reported = HashSet::new();
        for (a, b) in tree.pairs() {
            prop_assert_ne!(a, b);
            prop_assert!(model.contains_key(&a.collidable) && model.contains_key(&b.collidable));
            let pair = (a.collidable.min(b.collidable), a.collidable.max(b.collidable));
            prop_assert!(reported.insert(pair), "duplicate pair {:?}", pair);
        }

        let boxes: Vec<(u8, Aabb)> = model.into_iter().collect();
        for (i, (a, box_a)) in boxes.iter().enumerate() {
            for (b, box_b) in boxes.iter().skip(i + 1) {
                if box_a.overlaps(box_b) {
                    prop_assert!(reported.contains(&(*a.min(b), *a.max(b))));
                }
            }
        }
    }

    #[test]
    fn queries_never_report_removed_proxies(
        ops in prop::collection::vec(arb_op(), 0..200),
        query in arb_aabb(),
    ) {
        let (tree, model) = run(Config::default(), &ops);
        let found: Vec<u8> = tree.query_overlap(&query).map(|k| k.collidable).collect();
        let unique: HashSet<u8> = found.iter().copied().collect();
        prop_assert_eq!(unique.len(), found.len());
        for id in &unique {
            prop_assert!(model.contains_key(id));
        }
        for (id, aabb) in &model {
            if aabb.overlaps(&query) {
                prop_assert!(unique.contains(id));
            }
        }
    }

    #[test]
    fn rebuild_yields_full_binary_tree(ops in prop::collection::vec(arb_op(), 0..200)) {
        let (mut tree, model) = run(Config::default(), &ops);
        tree.rebuild();
        prop_assert_eq!(tree.pending_removals(), 0);
        prop_assert_eq!(tree.node_count(), (2 * model.len()).saturating_sub(1));
        let bound = (model.len().max(1) as f32).log2().ceil() as u32;
        prop_assert!(tree.height() <= bound);
    }
}
